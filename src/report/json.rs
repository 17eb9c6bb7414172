use crate::error::Result;
use plant_doctor_common::DiagnosisResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 診断結果をJSONで保存（整形済み、タイムスタンプ含む）
pub fn export_json(result: &DiagnosisResult, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(super::json_file_name(super::epoch_millis()));

    let content = serde_json::to_string_pretty(result)?;
    fs::write(&path, content)?;

    info!(path = %path.display(), "diagnosis exported as JSON");
    Ok(path)
}

/// 書き出したJSONを読み戻す
pub fn load_json(path: &Path) -> Result<DiagnosisResult> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_doctor_common::DiagnosisReply;

    #[test]
    fn test_export_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = DiagnosisResult::new(
            DiagnosisReply {
                disease_name: "زنگ برگ".into(),
                confidence: "متوسط".into(),
                description: "لکه‌های نارنجی".into(),
                treatments: vec![],
                preventions: vec!["تهویه".into()],
            },
            "۱۴۰۵/۷/۲۷، ۱۴:۳۰:۰۵",
        );

        let path = export_json(&result, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("diagnosis_") && name.ends_with(".json"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        assert!(content.contains("\"diseaseName\""));

        assert_eq!(load_json(&path).unwrap(), result);
    }
}

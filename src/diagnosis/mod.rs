mod gemini;
mod replay;

pub use gemini::GeminiClient;
pub use replay::ReplayProvider;

use crate::error::Result;
use async_trait::async_trait;
use plant_doctor_common::{
    now_formatted, parse_diagnosis_response, DiagnosisResult, EncodedImage, Language,
};

/// 画像診断の提供元
///
/// 送信方式・プロバイダを差し替えても状態遷移側は変更不要
#[async_trait]
pub trait DiagnosisProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn analyze(&self, image: &EncodedImage) -> Result<DiagnosisResult>;
}

/// モデル応答テキストから結果を構築（タイムスタンプはここで付与）
pub(crate) fn build_result(response_text: &str, language: Language) -> Result<DiagnosisResult> {
    let reply = parse_diagnosis_response(response_text)?;
    Ok(DiagnosisResult::new(reply, now_formatted(language.locale())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlantDoctorError;

    #[test]
    fn test_build_result_stamps_timestamp() {
        let text = r#"{"diseaseName":"Powdery mildew","confidence":"High","description":"White patches","treatments":["Sulfur spray"],"preventions":["Airflow"]}"#;
        let result = build_result(text, Language::English).unwrap();
        assert_eq!(result.disease_name(), "Powdery mildew");
        assert!(!result.timestamp().is_empty());
        assert!(result.timestamp().contains('/'));
    }

    #[test]
    fn test_build_result_parse_error() {
        let err = build_result("not json", Language::Persian).unwrap_err();
        assert!(matches!(err, PlantDoctorError::Common(plant_doctor_common::Error::Parse(_))));
        assert_eq!(err.kind(), "parse");

        // 必須項目の欠落は serde のエラーとして伝わる
        let incomplete = r#"{"diseaseName":"Rust","confidence":"High","description":"x","treatments":[]}"#;
        let err = build_result(incomplete, Language::English).unwrap_err();
        assert!(matches!(err, PlantDoctorError::Common(plant_doctor_common::Error::Json(_))));
    }
}

//! APIレスポンスパーサー
//!
//! モデル応答テキストからJSONオブジェクトを抽出し、
//! 診断5項目をパース・検証する

use crate::error::{Error, Result};
use crate::types::DiagnosisReply;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 最初の `{` から最後の `}` まで
/// 3. エラー
///
/// # Examples
/// ```
/// use plant_doctor_common::extract_json;
///
/// let response = "Result: {\"key\": \"value\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"key\": \"value\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("no JSON object found in response".into()))
}

/// 診断レスポンスをパース
///
/// # Returns
/// * `Ok(DiagnosisReply)` - 5項目すべてが揃っている
/// * `Err` - JSONが無い、必須項目の欠落、病名が空
pub fn parse_diagnosis_response(response: &str) -> Result<DiagnosisReply> {
    let json_str = extract_json(response)?;
    let reply: DiagnosisReply = serde_json::from_str(json_str.trim())?;

    if reply.disease_name.trim().is_empty() {
        return Err(Error::Parse("diseaseName is empty".into()));
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "diseaseName": "لکه برگی",
        "confidence": "بالا",
        "description": "لکه‌های قهوه‌ای",
        "treatments": ["سم‌پاشی با قارچ‌کش مسی", "حذف برگ‌های آلوده"],
        "preventions": ["تهویه مناسب"]
    }"#;

    #[test]
    fn test_parse_raw_json() {
        let reply = parse_diagnosis_response(RAW).unwrap();
        assert_eq!(reply.disease_name, "لکه برگی");
        assert_eq!(reply.confidence, "بالا");
        assert_eq!(reply.treatments.len(), 2);
        assert_eq!(reply.treatments[0], "سم‌پاشی با قارچ‌کش مسی");
        assert_eq!(reply.preventions, vec!["تهویه مناسب".to_string()]);
    }

    #[test]
    fn test_parse_json_block() {
        let response = format!("Here is the diagnosis:\n```json\n{}\n```\n", RAW);
        let reply = parse_diagnosis_response(&response).unwrap();
        assert_eq!(reply.disease_name, "لکه برگی");
    }

    #[test]
    fn test_parse_surrounded_by_prose() {
        let response = format!("Sure. {} Hope this helps.", RAW);
        assert!(parse_diagnosis_response(&response).is_ok());
    }

    #[test]
    fn test_missing_field_is_error() {
        let response = r#"{"diseaseName":"Rust","confidence":"High","description":"d","treatments":[]}"#;
        let err = parse_diagnosis_response(response).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("preventions"));
    }

    #[test]
    fn test_null_list_is_error() {
        let response = r#"{"diseaseName":"Rust","confidence":"High","description":"d","treatments":null,"preventions":[]}"#;
        assert!(parse_diagnosis_response(response).is_err());
    }

    #[test]
    fn test_blank_disease_name_is_error() {
        let response = r#"{"diseaseName":"  ","confidence":"High","description":"d","treatments":[],"preventions":[]}"#;
        let err = parse_diagnosis_response(response).unwrap_err();
        assert!(err.to_string().contains("diseaseName"));
    }

    #[test]
    fn test_no_json_is_error() {
        assert!(extract_json("I cannot analyze this image.").is_err());
        assert!(parse_diagnosis_response("").is_err());
    }
}

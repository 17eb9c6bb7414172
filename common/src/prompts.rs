//! プロンプト生成モジュール
//!
//! - build_diagnosis_prompt: 植物病理の専門家として診断させる指示文
//! - diagnosis_response_schema: Gemini responseSchema（5項目すべて必須）

use serde_json::{json, Value};

use crate::types::Language;

/// スキーマで必須とするフィールド
pub const REQUIRED_FIELDS: &[&str] = &[
    "diseaseName",
    "confidence",
    "description",
    "treatments",
    "preventions",
];

/// 診断プロンプト生成
pub fn build_diagnosis_prompt(language: Language) -> String {
    format!(
        r#"As an expert plant pathologist, analyze this plant image.
Identify if there is any disease.
Provide the response in {} language.
Be specific and professional."#,
        language.prompt_name()
    )
}

/// 応答スキーマ（Gemini REST形式: 型名は大文字）
pub fn diagnosis_response_schema(language: Language) -> Value {
    let lang = language.prompt_name();
    json!({
        "type": "OBJECT",
        "properties": {
            "diseaseName": {
                "type": "STRING",
                "description": format!("Name of the disease in {}", lang),
            },
            "confidence": {
                "type": "STRING",
                "description": format!("Confidence level like {}", language.confidence_examples()),
            },
            "description": {
                "type": "STRING",
                "description": format!("A brief description of the condition in {}", lang),
            },
            "treatments": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": format!("List of recommended treatments in {}", lang),
            },
            "preventions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": format!("List of prevention strategies in {}", lang),
            },
        },
        "required": REQUIRED_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_language() {
        let prompt = build_diagnosis_prompt(Language::Persian);
        assert!(prompt.contains("expert plant pathologist"));
        assert!(prompt.contains("PERSIAN (Farsi)"));

        let prompt = build_diagnosis_prompt(Language::English);
        assert!(prompt.contains("ENGLISH"));
    }

    #[test]
    fn test_schema_requires_five_fields() {
        let schema = diagnosis_response_schema(Language::Persian);
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);

        let props = schema["properties"].as_object().unwrap();
        assert_eq!(props.len(), 5);
        assert_eq!(props["treatments"]["type"], "ARRAY");
        assert_eq!(props["treatments"]["items"]["type"], "STRING");
        assert_eq!(props["preventions"]["type"], "ARRAY");
        assert_eq!(props["diseaseName"]["type"], "STRING");
    }
}

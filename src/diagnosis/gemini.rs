//! Gemini API連携
//!
//! 画像1枚＋診断プロンプトを generateContent に送信し、
//! responseSchema で5項目のJSONを返させる。
//! リトライなし。タイムアウトは設定時のみ。

use super::{build_result, DiagnosisProvider};
use crate::config::Config;
use crate::error::{PlantDoctorError, Result};
use async_trait::async_trait;
use plant_doctor_common::{
    build_diagnosis_prompt, diagnosis_response_schema, DiagnosisResult, EncodedImage, Language,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストパートを連結
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(PlantDoctorError::ApiParse(format!("prompt blocked: {}", reason)));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PlantDoctorError::ApiParse("Empty response".into()))?;

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(PlantDoctorError::ApiParse(format!(
                "no text in response (finishReason: {})",
                if finish_reason.is_empty() { "-" } else { finish_reason.as_str() }
            )));
        }

        Ok(text)
    }
}

fn build_request(image: &EncodedImage, language: Language, temperature: Option<f32>) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: build_diagnosis_prompt(language) },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type().to_string(),
                        data: image.payload().to_string(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature,
            response_mime_type: "application/json".to_string(),
            response_schema: diagnosis_response_schema(language),
        },
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    /// 呼び出し時に検証（未設定なら呼び出しが失敗する）
    api_key: Option<String>,
    language: Language,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.get_api_key().ok(),
            language: config.language,
            temperature: config.temperature,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Gemini API呼び出し（応答テキストを返す）
    async fn call_gemini_api(&self, request: &GeminiRequest) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(PlantDoctorError::MissingApiKey)?;

        let resp = self
            .http
            .post(self.url())
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(300).collect();
            warn!(%status, "Gemini API returned an error status");
            return Err(PlantDoctorError::ApiCall(format!("API error {}: {}", status, excerpt)));
        }

        let response: GeminiResponse = resp.json().await?;
        response.into_text()
    }
}

#[async_trait]
impl DiagnosisProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, image: &EncodedImage) -> Result<DiagnosisResult> {
        let request = build_request(image, self.language, self.temperature);
        debug!(
            model = %self.model,
            mime_type = image.mime_type(),
            payload_len = image.payload().len(),
            "sending diagnosis request"
        );

        let text = self.call_gemini_api(&request).await?;
        debug!(response_len = text.len(), "diagnosis response received");

        build_result(&text, self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialize() {
        let image = EncodedImage::from_data_url("data:image/png;base64,iVBORw0KGgo=");
        let request = build_request(&image, Language::Persian, None);
        let json = serde_json::to_value(&request).expect("シリアライズ失敗");

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0]["text"].as_str().unwrap().contains("PERSIAN"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "iVBORw0KGgo=");

        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert!(config.get("temperature").is_none());
    }

    #[test]
    fn test_request_without_prefix_defaults_to_jpeg() {
        let image = EncodedImage::from_data_url("/9j/4AAQSkZJRg==");
        let request = build_request(&image, Language::English, Some(0.1));
        let json = serde_json::to_value(&request).unwrap();

        let inline = &json["contents"][0]["parts"][1]["inline_data"];
        assert_eq!(inline["mime_type"], "image/jpeg");
        assert_eq!(inline["data"], "/9j/4AAQSkZJRg==");
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [ { "text": "{\"diseaseName\":" }, { "text": "\"x\"}" } ] },
                "finishReason": "STOP"
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), r#"{"diseaseName":"x"}"#);
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(response.into_text(), Err(PlantDoctorError::ApiParse(_))));
    }

    #[test]
    fn test_response_blocked_prompt() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_response_candidate_without_text() {
        let json = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_url() {
        let config = Config {
            endpoint: "http://localhost:9999/".into(),
            model: "gemini-test".into(),
            ..Default::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:9999/v1beta/models/gemini-test:generateContent");
    }
}

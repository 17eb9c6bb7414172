//! 記録済みモデル応答の再生
//!
//! ネットワークなしでレポートを再現する。応答テキストは
//! Gemini と同じパーサーを通す。

use super::{build_result, DiagnosisProvider};
use crate::error::{PlantDoctorError, Result};
use async_trait::async_trait;
use plant_doctor_common::{DiagnosisResult, EncodedImage, Language};
use std::path::PathBuf;
use tracing::debug;

pub struct ReplayProvider {
    reply_path: PathBuf,
    language: Language,
}

impl ReplayProvider {
    pub fn new(reply_path: impl Into<PathBuf>, language: Language) -> Self {
        Self {
            reply_path: reply_path.into(),
            language,
        }
    }
}

#[async_trait]
impl DiagnosisProvider for ReplayProvider {
    fn name(&self) -> &str {
        "replay"
    }

    async fn analyze(&self, image: &EncodedImage) -> Result<DiagnosisResult> {
        if !self.reply_path.is_file() {
            return Err(PlantDoctorError::FileNotFound(self.reply_path.display().to_string()));
        }

        let text = tokio::fs::read_to_string(&self.reply_path).await?;
        debug!(
            reply = %self.reply_path.display(),
            mime_type = image.mime_type(),
            "replaying recorded diagnosis"
        );
        build_result(&text, self.language)
    }
}

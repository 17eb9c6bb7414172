use clap::ValueEnum;
use std::path::Path;

use crate::config::Config;
use crate::diagnosis::{DiagnosisProvider, GeminiClient, ReplayProvider};
use crate::error::{PlantDoctorError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AiProvider {
    #[default]
    Gemini,
    /// 記録済み応答ファイルを再生（--replay 必須）
    Replay,
}

impl AiProvider {
    pub fn build(&self, config: &Config, replay: Option<&Path>) -> Result<Box<dyn DiagnosisProvider>> {
        match self {
            AiProvider::Gemini => Ok(Box::new(GeminiClient::from_config(config)?)),
            AiProvider::Replay => {
                let path = replay.ok_or_else(|| {
                    PlantDoctorError::Config("--ai-provider replay には --replay <FILE> が必要です".into())
                })?;
                Ok(Box::new(ReplayProvider::new(path, config.language)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_gemini() {
        let provider = AiProvider::Gemini.build(&Config::default(), None).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_build_replay_requires_file() {
        let err = AiProvider::Replay.build(&Config::default(), None).err().unwrap();
        assert!(matches!(err, PlantDoctorError::Config(_)));

        let provider = AiProvider::Replay
            .build(&Config::default(), Some(Path::new("reply.json")))
            .unwrap();
        assert_eq!(provider.name(), "replay");
    }
}

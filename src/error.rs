use thiserror::Error;

use crate::app::AppState;

#[derive(Error, Debug)]
pub enum PlantDoctorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY を設定するか `plant-doctor config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    UnsupportedImage(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("状態 {state} では {action} を実行できません")]
    InvalidTransition { state: AppState, action: &'static str },

    #[error("{0}")]
    AnalysisFailed(String),

    #[error(transparent)]
    Common(#[from] plant_doctor_common::Error),
}

impl PlantDoctorError {
    /// ログ出力用の分類名
    pub fn kind(&self) -> &'static str {
        match self {
            PlantDoctorError::Config(_) => "config",
            PlantDoctorError::MissingApiKey => "missing_api_key",
            PlantDoctorError::FileNotFound(_) => "file_not_found",
            PlantDoctorError::UnsupportedImage(_) => "unsupported_image",
            PlantDoctorError::ApiCall(_) => "api_call",
            PlantDoctorError::ApiParse(_) => "api_parse",
            PlantDoctorError::Http(_) => "transport",
            PlantDoctorError::JsonParse(_) => "json",
            PlantDoctorError::Io(_) => "io",
            PlantDoctorError::PdfGeneration(_) => "pdf",
            PlantDoctorError::InvalidTransition { .. } => "invalid_transition",
            PlantDoctorError::AnalysisFailed(_) => "analysis_failed",
            PlantDoctorError::Common(_) => "parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlantDoctorError>;

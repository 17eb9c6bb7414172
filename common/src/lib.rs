//! Plant Doctor Common Library
//!
//! 診断結果の型・プロンプト・パーサー・レイアウト計算など、UIに依存しない部分

pub mod types;
pub mod image_data;
pub mod layout;
pub mod locale;
pub mod error;
pub mod parser;
pub mod prompts;

pub use types::{DiagnosisReply, DiagnosisResult, Language, ReportLabels};
pub use image_data::{EncodedImage, extract_base64_from_data_url, extract_mime_type_from_data_url};
pub use locale::{Locale, format_timestamp, now_formatted};
pub use error::{Error, Result};
pub use parser::{extract_json, parse_diagnosis_response};
pub use prompts::{build_diagnosis_prompt, diagnosis_response_schema};

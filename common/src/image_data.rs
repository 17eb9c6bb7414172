//! Data URL形式の画像
//!
//! "data:image/jpeg;base64,/9j/4AAQ..." を保持し、
//! 送信時にはMIMEタイプとBase64部分を取り出す。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

/// プレフィックスが無い場合のMIMEタイプ
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Data URLからBase64データ部分を抽出
///
/// プレフィックスが無い場合はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出（抽出失敗時は"image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split([';', ',']).next())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// エンコード済み画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_url: String,
}

impl EncodedImage {
    /// バイト列からData URLを生成
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            data_url: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
        }
    }

    /// 既存のData URL（またはプレフィックス無しのBase64）をそのまま保持
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self { data_url: data_url.into() }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &str {
        extract_mime_type_from_data_url(&self.data_url)
    }

    /// 送信用Base64（プレフィックスが無ければ全体）
    pub fn payload(&self) -> &str {
        extract_base64_from_data_url(&self.data_url).unwrap_or(&self.data_url)
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.payload().trim())
            .map_err(|e| Error::Parse(format!("invalid base64 payload: {}", e)))
    }
}

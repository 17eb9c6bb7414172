//! 画像取得モジュール
//!
//! ファイル選択・カメラ撮影・ドラッグ＆ドロップされた画像を読み込み、
//! Data URLへエンコードする。ネットワークアクセスは行わない。

pub mod exif;

use crate::error::{PlantDoctorError, Result};
use image::{ImageFormat, ImageReader};
use plant_doctor_common::EncodedImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 画像の入手経路
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// ファイル選択（画像のみ選択可能）
    Picker,
    /// カメラ撮影（Pickerと同じ扱い）
    Camera,
    /// ドラッグ＆ドロップ（画像以外は黙って無視）
    Drop,
}

/// MIMEタイプ推定: マジックバイト → 拡張子の順
///
/// PNM(`P1`〜`P7`) や BMP(`BM`) のシグネチャは2バイトしかないので、
/// マジックバイトはヘッダーから寸法が読めた場合のみ採用する
pub fn infer_mime_type(bytes: &[u8], path: &Path) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .filter(|format| has_readable_header(bytes, *format))
        .or_else(|| ImageFormat::from_path(path).ok())
        .map(|format| format.to_mime_type())
        .filter(|mime| mime.starts_with("image/"))
}

fn has_readable_header(bytes: &[u8], format: ImageFormat) -> bool {
    match ImageReader::with_format(Cursor::new(bytes), format).into_dimensions() {
        Ok(_) => true,
        Err(e) => {
            debug!(?format, error = %e, "signature matched but header is unreadable");
            false
        }
    }
}

/// ファイルを読み込んでData URLを生成
pub async fn read_as_data_url(path: &Path) -> Result<EncodedImage> {
    if !path.is_file() {
        return Err(PlantDoctorError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    let mime_type = infer_mime_type(&bytes, path)
        .ok_or_else(|| PlantDoctorError::UnsupportedImage(path.display().to_string()))?;

    debug!(
        path = %path.display(),
        mime_type,
        size = bytes.len(),
        taken_at = exif::extract_date(&bytes).as_deref().unwrap_or("-"),
        "image loaded"
    );

    Ok(EncodedImage::from_bytes(&bytes, mime_type))
}

/// 画像を取得
///
/// - ファイルが無い: `Ok(None)`（何もしない）
/// - ドロップされたファイルが画像でない: `Ok(None)`
/// - 選択されたファイルが画像でない: `UnsupportedImage`
pub async fn acquire(source: ImageSource, path: Option<&Path>) -> Result<Option<EncodedImage>> {
    let Some(path) = path else {
        debug!(?source, "no file in selection");
        return Ok(None);
    };

    match read_as_data_url(path).await {
        Ok(image) => Ok(Some(image)),
        Err(PlantDoctorError::UnsupportedImage(name)) if source == ImageSource::Drop => {
            debug!(file = %name, "dropped file is not an image; ignored");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 端末にドロップ・貼り付けされたパス文字列を正規化
///
/// 引用符、`file://` プレフィックス、`\ ` エスケープを取り除く
pub fn normalize_dropped_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(trimmed);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let unescaped = without_scheme.replace("\\ ", " ");

    if unescaped.is_empty() {
        None
    } else {
        Some(PathBuf::from(unescaped))
    }
}

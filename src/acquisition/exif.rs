//! EXIF読み取り（向き・撮影日時）

use image::DynamicImage;
use std::io::Cursor;

fn read_exif(bytes: &[u8]) -> Option<exif::Exif> {
    let mut cursor = Cursor::new(bytes);
    exif::Reader::new().read_from_container(&mut cursor).ok()
}

/// EXIF Orientation (0x0112)。EXIFが無ければ1（正常）
pub fn read_orientation(bytes: &[u8]) -> u32 {
    read_exif(bytes)
        .and_then(|exif| {
            exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|f| f.value.get_uint(0))
        })
        .unwrap_or(1)
}

/// 向きを補正
///
/// 1 = 正常, 2 = 左右反転, 3 = 180度, 4 = 上下反転,
/// 5 = 左右反転+90度, 6 = 90度, 7 = 左右反転+270度, 8 = 270度
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// 撮影日時（DateTimeOriginal → DateTime の順に探す）
pub fn extract_date(bytes: &[u8]) -> Option<String> {
    let exif = read_exif(bytes)?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .find_map(|tag| exif.get_field(tag, exif::In::PRIMARY))
        .map(|field| field.display_value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_no_exif_defaults() {
        assert_eq!(read_orientation(b"not an image"), 1);
        assert!(extract_date(b"not an image").is_none());
    }

    #[test]
    fn test_apply_orientation_rotates() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
        let rotated = apply_orientation(img.clone(), 6);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));

        let same = apply_orientation(img, 1);
        assert_eq!((same.width(), same.height()), (4, 2));
    }
}

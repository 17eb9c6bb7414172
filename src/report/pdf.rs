//! PDF出力
//!
//! レポートを CAPTURE_SCALE 倍でラスタ化し、1ページに幅いっぱいで貼る。
//! ページ幅はA4、高さは画像の比率に合わせる（A4未満にはしない）。

use super::snapshot::render_snapshot;
use super::ReportView;
use crate::error::{PlantDoctorError, Result};
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use plant_doctor_common::layout::{
    full_width_dpi, page_height_mm, proportional_height_mm, A4_WIDTH_MM, CAPTURE_SCALE,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// `plant_report_<ms>.pdf` を output_dir に書き出す
pub fn export_pdf(view: &ReportView<'_>, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(super::pdf_file_name(super::epoch_millis()));
    generate_pdf(view, &path)?;
    Ok(path)
}

pub fn generate_pdf(view: &ReportView<'_>, output_path: &Path) -> Result<()> {
    let snapshot = render_snapshot(view, CAPTURE_SCALE)?;
    let (width, height) = snapshot.dimensions();

    let page_h = page_height_mm(width, height);
    let image_h = proportional_height_mm(width, height);

    let (doc, page1, layer1) = PdfDocument::new(
        view.result().disease_name(),
        Mm(A4_WIDTH_MM),
        Mm(page_h),
        "Report",
    );
    let layer = doc.get_page(page1).get_layer(layer1);

    // printpdf側のimageクレートへ生バッファで受け渡す
    let raster = RgbImage::from_raw(width, height, snapshot.into_raw())
        .ok_or_else(|| PlantDoctorError::PdfGeneration("スナップショットのバッファ長が不正".into()))?;
    let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(raster));

    // 上端揃え（PDF座標は左下原点）
    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(page_h - image_h)),
            dpi: Some(full_width_dpi(width)),
            ..Default::default()
        },
    );

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| PlantDoctorError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))?;

    info!(
        path = %output_path.display(),
        width,
        height,
        page_height_mm = page_h,
        "report exported as PDF"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_doctor_common::{DiagnosisReply, DiagnosisResult, EncodedImage, Language};

    #[test]
    fn test_generate_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let result = DiagnosisResult::new(
            DiagnosisReply {
                disease_name: "Healthy".into(),
                confidence: "High".into(),
                description: "No disease found".into(),
                treatments: vec![],
                preventions: vec!["Keep watering regularly".into()],
            },
            "10/19/2026, 9:00:00 AM",
        );
        let image = EncodedImage::from_bytes(b"broken", "image/jpeg");
        let view = ReportView::new(&result, &image, Language::English);

        let path = dir.path().join("report.pdf");
        generate_pdf(&view, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

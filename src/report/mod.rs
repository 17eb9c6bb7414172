//! レポート表示・出力モジュール
//!
//! - view: 端末表示
//! - snapshot: ラスタ画像化（PDF用）
//! - typeset: 同梱フォントによる文字組み
//! - json / pdf: ファイル出力

pub mod json;
pub mod pdf;
pub mod snapshot;
mod typeset;
mod view;

pub use view::ReportView;

use crate::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Pdf,
    Both,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Pdf => write!(f, "pdf"),
            ReportFormat::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "pdf" => Ok(ReportFormat::Pdf),
            "both" => Ok(ReportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, pdf or both", s)),
        }
    }
}

pub(crate) fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn json_file_name(millis: i64) -> String {
    format!("diagnosis_{}.json", millis)
}

pub fn pdf_file_name(millis: i64) -> String {
    format!("plant_report_{}.pdf", millis)
}

/// 指定形式でレポートを出力し、書き出したパスを返す
pub fn export_report(view: &ReportView<'_>, format: ReportFormat, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, ReportFormat::Pdf | ReportFormat::Both) {
        println!("- PDFを生成中...");
        let path = pdf::export_pdf(view, output_dir)?;
        println!("✔ PDF出力: {}", path.display());
        written.push(path);
    }

    if matches!(format, ReportFormat::Json | ReportFormat::Both) {
        let path = json::export_json(view.result(), output_dir)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

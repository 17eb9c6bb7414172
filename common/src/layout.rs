//! レイアウト設定モジュール
//!
//! レポートのスナップショット（px）とPDFページ（mm）の寸法定義

// ============================================
// PDFページ（mm基準）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

pub const MM_PER_INCH: f32 = 25.4;

// ============================================
// スナップショット（論理px基準、描画時にCAPTURE_SCALE倍）
// ============================================

/// キャプチャ倍率
pub const CAPTURE_SCALE: u32 = 2;

/// レポート幅（論理px）
pub const REPORT_WIDTH_PX: u32 = 600;
pub const REPORT_MARGIN_PX: u32 = 24;
pub const REPORT_CONTENT_WIDTH_PX: u32 = REPORT_WIDTH_PX - REPORT_MARGIN_PX * 2; // 552px

/// プレビュー画像の最大高さ（論理px）
pub const PREVIEW_MAX_HEIGHT_PX: u32 = 320;
/// 画像が読めない場合のプレースホルダー高さ
pub const PREVIEW_PLACEHOLDER_HEIGHT_PX: u32 = 160;

/// 画像をページ幅いっぱいに配置するためのDPI
pub fn full_width_dpi(width_px: u32) -> f32 {
    width_px as f32 * MM_PER_INCH / A4_WIDTH_MM
}

/// ページ幅に合わせた画像高さ（mm、縦横比維持）
pub fn proportional_height_mm(width_px: u32, height_px: u32) -> f32 {
    if width_px == 0 {
        return 0.0;
    }
    A4_WIDTH_MM * height_px as f32 / width_px as f32
}

/// ページ高さ（A4未満にはしない）
pub fn page_height_mm(width_px: u32, height_px: u32) -> f32 {
    proportional_height_mm(width_px, height_px).max(A4_HEIGHT_MM)
}

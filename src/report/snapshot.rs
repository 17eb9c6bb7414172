//! レポートのラスタ画像化
//!
//! 論理px（幅600）でレイアウトし、scale 倍で描画する。
//! 文字は同梱フォントをシェーピングして描く（typeset）。
//! ペルシア語のレポートは右から左に組む（アイコンと箇条書きの点は右側、本文は右揃え）。
//! 高さは内容次第なので、計測パスと描画パスの2回レイアウトする。

use super::typeset::{Typeface, Weight};
use super::ReportView;
use crate::acquisition::exif::{apply_orientation, read_orientation};
use crate::error::Result;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use plant_doctor_common::layout::{
    PREVIEW_MAX_HEIGHT_PX, PREVIEW_PLACEHOLDER_HEIGHT_PX, REPORT_CONTENT_WIDTH_PX, REPORT_MARGIN_PX,
    REPORT_WIDTH_PX,
};
use plant_doctor_common::EncodedImage;
use tracing::debug;

type Color = [u8; 3];

const WHITE: Color = [255, 255, 255];
const SLATE_50: Color = [248, 250, 252];
const SLATE_100: Color = [241, 245, 249];
const SLATE_400: Color = [148, 163, 184];
const SLATE_600: Color = [71, 85, 105];
const SLATE_900: Color = [15, 23, 42];
const NATURE_500: Color = [34, 197, 94];
const NATURE_600: Color = [22, 163, 74];
const BLUE_400: Color = [96, 165, 250];
const BLUE_500: Color = [59, 130, 246];
const ORANGE_400: Color = [251, 146, 60];
const ORANGE_500: Color = [249, 115, 22];

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    size: f32,
    weight: Weight,
}

const HEADING: TextStyle = TextStyle { size: 26.0, weight: Weight::Bold };
const TITLE: TextStyle = TextStyle { size: 17.0, weight: Weight::Bold };
const BODY: TextStyle = TextStyle { size: 15.0, weight: Weight::Regular };
const SMALL: TextStyle = TextStyle { size: 12.0, weight: Weight::Regular };
const BADGE: TextStyle = TextStyle { size: 12.0, weight: Weight::Bold };

const SECTION_GAP: u32 = 20;
const BOX_PADDING: u32 = 10;
const ICON_PX: u32 = 12;
const HEADING_ICON_PX: u32 = 24;
const BULLET_INSET: u32 = 14;

/// 行の高さ（論理px）
fn line_height(style: TextStyle) -> u32 {
    (style.size * 1.6).ceil() as u32
}

fn block_height(lines: usize, style: TextStyle) -> u32 {
    lines as u32 * line_height(style)
}

/// 被覆率で合成
fn blend(pixel: &mut Rgb<u8>, color: Color, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    for (dst, src) in pixel.0.iter_mut().zip(color) {
        *dst = (*dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8;
    }
}

/// 論理座標で描画する。canvas が無ければ計測のみ
struct Painter<'a> {
    canvas: Option<&'a mut RgbImage>,
    typeface: &'a Typeface,
    scale: u32,
    rtl: bool,
    y: u32,
}

impl<'a> Painter<'a> {
    fn measure(typeface: &'a Typeface, scale: u32, rtl: bool) -> Self {
        Self { canvas: None, typeface, scale, rtl, y: 0 }
    }

    fn draw(canvas: &'a mut RgbImage, typeface: &'a Typeface, scale: u32, rtl: bool) -> Self {
        Self { canvas: Some(canvas), typeface, scale, rtl, y: 0 }
    }

    /// デバイスpxで矩形を塗る
    fn fill_device(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let Some(canvas) = self.canvas.as_deref_mut() else {
            return;
        };
        let x_end = (x + w).min(canvas.width());
        let y_end = (y + h).min(canvas.height());
        for py in y..y_end {
            for px in x..x_end {
                canvas.put_pixel(px, py, Rgb(color));
            }
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let s = self.scale;
        self.fill_device(x * s, y * s, w * s, h * s, color);
    }

    fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        if w == 0 || h == 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    fn dot(&mut self, cx: u32, cy: u32, radius: u32, color: Color) {
        let s = self.scale;
        let r = (radius * s) as i64;
        let (cx, cy) = ((cx * s) as i64, (cy * s) as i64);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r && cx + dx >= 0 && cy + dy >= 0 {
                    self.fill_device((cx + dx) as u32, (cy + dy) as u32, 1, 1, color);
                }
            }
        }
    }

    /// 行頭側に lead px 空けた残りの領域 (x, w)
    fn inset(&self, x: u32, w: u32, lead: u32) -> (u32, u32) {
        let w = w.saturating_sub(lead);
        if self.rtl {
            (x, w)
        } else {
            (x + lead, w)
        }
    }

    /// 行頭側に置く幅 item_w の要素の x
    fn leading_x(&self, x: u32, w: u32, item_w: u32) -> u32 {
        if self.rtl {
            x + w.saturating_sub(item_w)
        } else {
            x
        }
    }

    fn wrap(&self, text: &str, style: TextStyle, width: u32) -> Vec<String> {
        self.typeface.wrap(text, style.weight, style.size, width as f32, self.rtl)
    }

    fn text_width(&self, text: &str, style: TextStyle) -> u32 {
        self.typeface.measure(text, style.weight, style.size, self.rtl).ceil() as u32
    }

    /// 1行を [x, x + width] に行頭揃えで描画
    fn line(&mut self, x: u32, y: u32, width: u32, text: &str, style: TextStyle, color: Color) {
        let typeface = self.typeface;
        let rtl = self.rtl;
        let s = self.scale as f32;
        let Some(canvas) = self.canvas.as_deref_mut() else {
            return;
        };

        let px = style.size * s;
        let shaped = typeface.shape_line(text, style.weight, px, rtl);
        let origin_x = if rtl {
            (x + width) as f32 * s - shaped.width
        } else {
            x as f32 * s
        };
        let half_leading = (line_height(style) as f32 - style.size) / 2.0;
        let baseline = (y as f32 + half_leading) * s + typeface.ascent(style.weight, px);

        for glyph in &shaped.glyphs {
            let Some(outlined) = typeface.outline(style.weight, glyph, px, origin_x, baseline) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let cx = bounds.min.x as i64 + gx as i64;
                let cy = bounds.min.y as i64 + gy as i64;
                if cx < 0 || cy < 0 || cx >= canvas.width() as i64 || cy >= canvas.height() as i64 {
                    return;
                }
                blend(canvas.get_pixel_mut(cx as u32, cy as u32), color, coverage);
            });
        }
    }

    /// 折り返して描画し、y を進める
    fn paragraph(&mut self, x: u32, width: u32, text: &str, style: TextStyle, color: Color) {
        for line in self.wrap(text, style, width) {
            self.line(x, self.y, width, &line, style, color);
            self.y += line_height(style);
        }
    }

    fn blit(&mut self, image: &RgbImage, x: u32, y: u32) {
        if let Some(canvas) = self.canvas.as_deref_mut() {
            imageops::replace(canvas, image, x as i64, y as i64);
        }
    }
}

/// プレビュー画像をデバイス解像度で用意（デコード失敗時は None）
fn load_preview(encoded: &EncodedImage, scale: u32) -> Option<RgbImage> {
    let bytes = match encoded.decode_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "preview payload is not valid base64");
            return None;
        }
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            debug!(error = %e, mime_type = encoded.mime_type(), "preview could not be decoded");
            return None;
        }
    };

    let oriented = apply_orientation(decoded, read_orientation(&bytes));
    let fitted = oriented.resize(
        REPORT_CONTENT_WIDTH_PX * scale,
        PREVIEW_MAX_HEIGHT_PX * scale,
        FilterType::Triangle,
    );
    Some(fitted.to_rgb8())
}

fn section_title(p: &mut Painter<'_>, label: &str, icon: Color) {
    let m = REPORT_MARGIN_PX;
    let cw = REPORT_CONTENT_WIDTH_PX;
    let title_h = line_height(TITLE);
    let icon_x = p.leading_x(m, cw, ICON_PX);
    p.fill_rect(icon_x, p.y + (title_h - ICON_PX) / 2, ICON_PX, ICON_PX, icon);
    let (text_x, text_w) = p.inset(m, cw, ICON_PX + 8);
    p.line(text_x, p.y, text_w, label, TITLE, SLATE_900);
    p.y += title_h + 8;
}

fn bullet_list(p: &mut Painter<'_>, items: &[String], bullet: Color) {
    let m = REPORT_MARGIN_PX;
    let cw = REPORT_CONTENT_WIDTH_PX;
    let inner_x = m + BOX_PADDING;
    let inner_w = cw - BOX_PADDING * 2;
    let (text_x, text_w) = p.inset(inner_x, inner_w, BULLET_INSET);
    let dot_x = p.leading_x(inner_x, inner_w, 8) + 4;

    for item in items {
        let lines = p.wrap(item, BODY, text_w).len();
        let box_h = block_height(lines, BODY) + BOX_PADDING * 2;
        let top = p.y;

        p.stroke_rect(m, top, cw, box_h, SLATE_100);
        p.dot(dot_x, top + BOX_PADDING + line_height(BODY) / 2, 4, bullet);
        p.y = top + BOX_PADDING;
        p.paragraph(text_x, text_w, item, BODY, SLATE_600);
        p.y = top + box_h + 8;
    }
}

fn paint(p: &mut Painter<'_>, view: &ReportView<'_>, preview: Option<&RgbImage>) {
    let m = REPORT_MARGIN_PX;
    let cw = REPORT_CONTENT_WIDTH_PX;
    let labels = view.labels();
    let result = view.result();

    // 画像パネル
    let preview_h = preview
        .map(|img| img.height().div_ceil(p.scale))
        .unwrap_or(PREVIEW_PLACEHOLDER_HEIGHT_PX);
    p.fill_rect(0, 0, REPORT_WIDTH_PX, preview_h + m * 2, SLATE_50);
    match preview {
        Some(img) => {
            let x = (REPORT_WIDTH_PX * p.scale).saturating_sub(img.width()) / 2;
            p.blit(img, x, m * p.scale);
        }
        None => {
            p.fill_rect(m, m, cw, preview_h, SLATE_100);
            p.stroke_rect(m, m, cw, preview_h, SLATE_400);
            let label = "[ image ]";
            let label_w = p.text_width(label, BODY).min(cw);
            let label_y = m + (preview_h - line_height(BODY)) / 2;
            p.line(m + (cw - label_w) / 2, label_y, label_w, label, BODY, SLATE_400);
        }
    }

    // 信頼度バッジ（右上、1行に収まらない分は切る）
    let badge = p
        .wrap(&view.badge_text(), BADGE, cw - 48)
        .into_iter()
        .next()
        .unwrap_or_default();
    let badge_w = p.text_width(&badge, BADGE) + 16;
    let badge_h = line_height(BADGE) + 4;
    let badge_x = m + cw - badge_w - 8;
    p.fill_rect(badge_x, m + 8, badge_w, badge_h, NATURE_600);
    p.line(badge_x + 8, m + 10, badge_w - 16, &badge, BADGE, WHITE);

    p.y = preview_h + m * 3;

    // 病名
    let heading_top = p.y;
    let icon_x = p.leading_x(m, cw, HEADING_ICON_PX);
    let icon_y = heading_top + (line_height(HEADING) - HEADING_ICON_PX) / 2;
    p.fill_rect(icon_x, icon_y, HEADING_ICON_PX, HEADING_ICON_PX, NATURE_500);
    let (text_x, text_w) = p.inset(m, cw, HEADING_ICON_PX + 12);
    p.paragraph(text_x, text_w, result.disease_name(), HEADING, SLATE_900);
    p.y = p.y.max(icon_y + HEADING_ICON_PX) + SECTION_GAP;

    // 説明
    section_title(p, labels.description, NATURE_500);
    let desc_w = cw - BOX_PADDING * 2;
    let desc_lines = p.wrap(result.description(), BODY, desc_w).len();
    let desc_h = block_height(desc_lines, BODY) + BOX_PADDING * 2;
    let desc_top = p.y;
    p.fill_rect(m, desc_top, cw, desc_h, SLATE_50);
    p.y += BOX_PADDING;
    p.paragraph(m + BOX_PADDING, desc_w, result.description(), BODY, SLATE_600);
    p.y = desc_top + desc_h + SECTION_GAP;

    section_title(p, labels.treatments, BLUE_500);
    bullet_list(p, result.treatments(), BLUE_400);
    p.y += SECTION_GAP;

    section_title(p, labels.preventions, ORANGE_500);
    bullet_list(p, result.preventions(), ORANGE_400);
    p.y += SECTION_GAP;

    // フッター
    let footer = view.footer_text();
    let footer_lines = p.wrap(&footer, SMALL, cw).len();
    let footer_h = block_height(footer_lines, SMALL) + m * 2;
    let footer_top = p.y;
    p.fill_rect(0, footer_top, REPORT_WIDTH_PX, footer_h, SLATE_50);
    p.fill_rect(0, footer_top, REPORT_WIDTH_PX, 1, SLATE_100);
    p.y += m;
    p.paragraph(m, cw, &footer, SMALL, SLATE_400);
    p.y = footer_top + footer_h;
}

/// レポートを scale 倍で画像化（幅は REPORT_WIDTH_PX × scale）
pub fn render_snapshot(view: &ReportView<'_>, scale: u32) -> Result<RgbImage> {
    let scale = scale.max(1);
    let typeface = Typeface::bundled()?;
    let rtl = view.language().locale().is_rtl();
    let preview = load_preview(view.image(), scale);

    let mut measure = Painter::measure(&typeface, scale, rtl);
    paint(&mut measure, view, preview.as_ref());
    let height = measure.y;

    let mut canvas = RgbImage::from_pixel(REPORT_WIDTH_PX * scale, height * scale, Rgb(WHITE));
    let mut painter = Painter::draw(&mut canvas, &typeface, scale, rtl);
    paint(&mut painter, view, preview.as_ref());

    debug!(
        width = canvas.width(),
        height = canvas.height(),
        preview = preview.is_some(),
        rtl,
        "report rasterized"
    );
    Ok(canvas)
}

//! 文字組み
//!
//! 同梱の DejaVu Sans を rustybuzz でシェーピングし、ab_glyph のアウトラインで描く。
//! 1行の中の並びは unicode-bidi の表示順（ペルシア語と数字・英字の混在に対応）。

use crate::error::{PlantDoctorError, Result};
use ab_glyph::{Font, FontRef, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use rustybuzz::{Direction, UnicodeBuffer};
use unicode_bidi::{BidiInfo, Level};

static REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

struct Face {
    outline: FontRef<'static>,
    shaper: rustybuzz::Face<'static>,
}

impl Face {
    fn load(data: &'static [u8], name: &str) -> Result<Self> {
        let outline = FontRef::try_from_slice(data)
            .map_err(|e| PlantDoctorError::PdfGeneration(format!("フォント {} を読み込めません: {}", name, e)))?;
        let shaper = rustybuzz::Face::from_slice(data, 0)
            .ok_or_else(|| PlantDoctorError::PdfGeneration(format!("フォント {} を解析できません", name)))?;
        Ok(Self { outline, shaper })
    }
}

/// シェーピング済みグリフ（x はペン位置、y はベースラインからの下方向オフセット）
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph {
    pub id: GlyphId,
    pub x: f32,
    pub y: f32,
}

/// 表示順に並んだ1行分のグリフ
#[derive(Debug, Clone, Default)]
pub struct ShapedLine {
    pub glyphs: Vec<PlacedGlyph>,
    pub width: f32,
}

pub struct Typeface {
    regular: Face,
    bold: Face,
}

impl Typeface {
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            regular: Face::load(REGULAR_TTF, "DejaVuSans")?,
            bold: Face::load(BOLD_TTF, "DejaVuSans-Bold")?,
        })
    }

    fn face(&self, weight: Weight) -> &Face {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    /// ベースラインまでの高さ（px）
    pub fn ascent(&self, weight: Weight, px: f32) -> f32 {
        self.face(weight).outline.as_scaled(PxScale::from(px)).ascent()
    }

    /// 1行をシェーピングする
    ///
    /// rtl は段落の基本方向。方向の異なる部分は bidi の規則で並べ替える。
    pub fn shape_line(&self, text: &str, weight: Weight, px: f32, rtl: bool) -> ShapedLine {
        let face = self.face(weight);
        let units_to_px = face.outline.as_scaled(PxScale::from(px)).h_scale_factor();
        let base = if rtl { Level::rtl() } else { Level::ltr() };
        let bidi = BidiInfo::new(text, Some(base));

        let mut line = ShapedLine::default();
        for para in &bidi.paragraphs {
            let (levels, runs) = bidi.visual_runs(para, para.range.clone());
            for run in runs {
                let direction = if levels[run.start].is_rtl() {
                    Direction::RightToLeft
                } else {
                    Direction::LeftToRight
                };
                let mut buffer = UnicodeBuffer::new();
                buffer.push_str(&text[run]);
                buffer.set_direction(direction);
                buffer.guess_segment_properties();

                // RTL の run も表示順（左から右）で返る
                let shaped = rustybuzz::shape(&face.shaper, &[], buffer);
                for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
                    line.glyphs.push(PlacedGlyph {
                        id: GlyphId(info.glyph_id as u16),
                        x: line.width + pos.x_offset as f32 * units_to_px,
                        y: -(pos.y_offset as f32) * units_to_px,
                    });
                    line.width += pos.x_advance as f32 * units_to_px;
                }
            }
        }
        line
    }

    pub fn measure(&self, text: &str, weight: Weight, px: f32, rtl: bool) -> f32 {
        self.shape_line(text, weight, px, rtl).width
    }

    /// 幅に収まるよう単語単位で折り返す（1語で収まらなければ文字単位）
    pub fn wrap(&self, text: &str, weight: Weight, px: f32, max_width: f32, rtl: bool) -> Vec<String> {
        let fits = |candidate: &str| self.measure(candidate, weight, px, rtl) <= max_width;
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                current.push(ch);
                if current.chars().count() > 1 && !fits(&current) {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    /// 位置決め済みグリフのアウトライン（空白など形の無いグリフは None）
    pub fn outline(&self, weight: Weight, glyph: &PlacedGlyph, px: f32, origin_x: f32, baseline: f32) -> Option<OutlinedGlyph> {
        let positioned = glyph
            .id
            .with_scale_and_position(PxScale::from(px), ab_glyph::point(origin_x + glyph.x, baseline + glyph.y));
        self.face(weight).outline.outline_glyph(positioned)
    }
}

use plant_doctor_common::{DiagnosisResult, EncodedImage, Language, ReportLabels};
use std::fmt;

/// 結果画面に表示されるレポート
///
/// 結果と画像を借用するだけで、状態は持たない
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    result: &'a DiagnosisResult,
    image: &'a EncodedImage,
    language: Language,
}

impl<'a> ReportView<'a> {
    pub fn new(result: &'a DiagnosisResult, image: &'a EncodedImage, language: Language) -> Self {
        Self { result, image, language }
    }

    pub fn result(&self) -> &'a DiagnosisResult {
        self.result
    }

    pub fn image(&self) -> &'a EncodedImage {
        self.image
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn labels(&self) -> ReportLabels {
        self.language.labels()
    }

    /// 信頼度バッジの文言
    pub fn badge_text(&self) -> String {
        format!("{}: {}", self.labels().confidence, self.result.confidence())
    }

    pub fn footer_text(&self) -> String {
        format!("{}: {}", self.labels().generated_at, self.result.timestamp())
    }
}

const RULE: &str = "────────────────────────────────────────";

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.labels();
        let result = self.result;

        writeln!(f, "{}", RULE)?;
        writeln!(f, "🌿 {}", result.disease_name())?;
        writeln!(f, "   [{}]  🖼  {}", self.badge_text(), self.image.mime_type())?;
        writeln!(f)?;

        writeln!(f, "ℹ️  {}", labels.description)?;
        writeln!(f, "   {}", result.description())?;
        writeln!(f)?;

        writeln!(f, "✅ {}", labels.treatments)?;
        for (i, item) in result.treatments().iter().enumerate() {
            writeln!(f, "   {}. {}", i + 1, item)?;
        }
        writeln!(f)?;

        writeln!(f, "⚠️  {}", labels.preventions)?;
        for item in result.preventions() {
            writeln!(f, "   • {}", item)?;
        }

        writeln!(f, "{}", RULE)?;
        write!(f, "{}", self.footer_text())
    }
}

//! 診断結果の型定義
//!
//! - DiagnosisReply: AIモデルが返す5項目
//! - DiagnosisResult: 5項目 + クライアント側で付与するタイムスタンプ
//! - Language: 応答言語・ロケール・レポート見出しの切り替え

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// AIモデルの応答（スキーマ上すべて必須）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisReply {
    pub disease_name: String,
    pub confidence: String,
    pub description: String,
    pub treatments: Vec<String>,
    pub preventions: Vec<String>,
}

/// 1回の解析結果
///
/// 構築後は変更不可。フィールドはアクセサ経由でのみ参照する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    disease_name: String,
    confidence: String,
    description: String,
    treatments: Vec<String>,
    preventions: Vec<String>,
    timestamp: String,
}

impl DiagnosisResult {
    pub fn new(reply: DiagnosisReply, timestamp: impl Into<String>) -> Self {
        Self {
            disease_name: reply.disease_name,
            confidence: reply.confidence,
            description: reply.description,
            treatments: reply.treatments,
            preventions: reply.preventions,
            timestamp: timestamp.into(),
        }
    }

    pub fn disease_name(&self) -> &str {
        &self.disease_name
    }

    pub fn confidence(&self) -> &str {
        &self.confidence
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn treatments(&self) -> &[String] {
        &self.treatments
    }

    pub fn preventions(&self) -> &[String] {
        &self.preventions
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// 本文が書かれている言語（病名・説明にアラビア文字があればペルシア語）
    pub fn written_language(&self) -> Language {
        let arabic_script = [self.disease_name.as_str(), self.description.as_str()]
            .into_iter()
            .flat_map(|text| text.chars())
            .any(is_arabic_script);
        if arabic_script {
            Language::Persian
        } else {
            Language::English
        }
    }
}

fn is_arabic_script(ch: char) -> bool {
    matches!(ch,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

/// 応答言語
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Persian,
    English,
}

/// レポート見出し
#[derive(Debug, Clone, Copy)]
pub struct ReportLabels {
    pub confidence: &'static str,
    pub description: &'static str,
    pub treatments: &'static str,
    pub preventions: &'static str,
    pub generated_at: &'static str,
}

impl Language {
    /// プロンプト内で指定する言語名
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Language::Persian => "PERSIAN (Farsi)",
            Language::English => "ENGLISH",
        }
    }

    pub fn locale(&self) -> Locale {
        match self {
            Language::Persian => Locale::FaIr,
            Language::English => Locale::EnUs,
        }
    }

    /// 信頼度の例（スキーマ説明に埋め込む）
    pub fn confidence_examples(&self) -> &'static str {
        match self {
            Language::Persian => "'بالا' or 'متوسط'",
            Language::English => "'High' or 'Medium'",
        }
    }

    /// 解析失敗時にユーザーへ表示する固定メッセージ
    pub fn analysis_failure_message(&self) -> &'static str {
        match self {
            Language::Persian => "متاسفانه خطایی در تحلیل تصویر رخ داد. لطفا دوباره تلاش کنید.",
            Language::English => "Sorry, an error occurred while analyzing the image. Please try again.",
        }
    }

    pub fn labels(&self) -> ReportLabels {
        match self {
            Language::Persian => ReportLabels {
                confidence: "دقت تحلیل",
                description: "شرح وضعیت",
                treatments: "راهکارهای بهبود و درمان",
                preventions: "اقدامات پیشگیرانه",
                generated_at: "گزارش تولید شده در",
            },
            Language::English => ReportLabels {
                confidence: "Confidence",
                description: "Description",
                treatments: "Treatments",
                preventions: "Preventive measures",
                generated_at: "Report generated at",
            },
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "persian" | "farsi" | "fa" => Ok(Language::Persian),
            "english" | "en" => Ok(Language::English),
            _ => Err(format!("Unknown language: {}. Use persian or english", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Persian => write!(f, "persian"),
            Language::English => write!(f, "english"),
        }
    }
}

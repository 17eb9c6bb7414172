//! アプリケーション状態遷移
//!
//! landing → uploading → analyzing → result の4状態。
//! 状態は App が単独で所有し、グローバルな可変状態は持たない。
//!
//! | From      | 操作               | To        |
//! |-----------|--------------------|-----------|
//! | landing   | start              | uploading |
//! | uploading | 画像選択           | analyzing |
//! | analyzing | 解析成功           | result    |
//! | analyzing | 解析失敗           | uploading |
//! | result    | reset              | landing   |

use crate::acquisition::{self, ImageSource};
use crate::diagnosis::DiagnosisProvider;
use crate::error::{PlantDoctorError, Result};
use crate::report::{self, ReportView};
use plant_doctor_common::{DiagnosisResult, EncodedImage, Language};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 表示中の画面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Landing,
    Uploading,
    Analyzing,
    Result,
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppState::Landing => write!(f, "landing"),
            AppState::Uploading => write!(f, "uploading"),
            AppState::Analyzing => write!(f, "analyzing"),
            AppState::Result => write!(f, "result"),
        }
    }
}

/// 状態ごとに保持するデータ
///
/// result は結果と画像を必ず同時に持つ
#[derive(Debug)]
enum Screen {
    Landing,
    Uploading { error: Option<String> },
    Analyzing { image: EncodedImage },
    Result { result: DiagnosisResult, image: EncodedImage },
}

pub struct App {
    screen: Screen,
    provider: Box<dyn DiagnosisProvider>,
    language: Language,
}

impl App {
    pub fn new(provider: Box<dyn DiagnosisProvider>, language: Language) -> Self {
        Self {
            screen: Screen::Landing,
            provider,
            language,
        }
    }

    pub fn state(&self) -> AppState {
        match self.screen {
            Screen::Landing => AppState::Landing,
            Screen::Uploading { .. } => AppState::Uploading,
            Screen::Analyzing { .. } => AppState::Analyzing,
            Screen::Result { .. } => AppState::Result,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// ユーザー向けエラーメッセージ（uploading のみ）
    pub fn error(&self) -> Option<&str> {
        match &self.screen {
            Screen::Uploading { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&DiagnosisResult> {
        match &self.screen {
            Screen::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    /// 解析中・結果表示中の画像
    pub fn image(&self) -> Option<&EncodedImage> {
        match &self.screen {
            Screen::Analyzing { image } | Screen::Result { image, .. } => Some(image),
            _ => None,
        }
    }

    fn invalid(&self, action: &'static str) -> PlantDoctorError {
        PlantDoctorError::InvalidTransition {
            state: self.state(),
            action,
        }
    }

    /// landing → uploading
    pub fn start(&mut self) -> Result<()> {
        if !matches!(self.screen, Screen::Landing) {
            return Err(self.invalid("start"));
        }
        self.screen = Screen::Uploading { error: None };
        Ok(())
    }

    /// uploading → analyzing（前回のエラーは消える）
    pub fn begin_analysis(&mut self, image: EncodedImage) -> Result<()> {
        if !matches!(self.screen, Screen::Uploading { .. }) {
            return Err(self.invalid("select image"));
        }
        debug!(mime_type = image.mime_type(), provider = self.provider.name(), "analysis started");
        self.screen = Screen::Analyzing { image };
        Ok(())
    }

    /// analyzing → result / uploading
    ///
    /// 失敗時は原因を問わず固定のローカライズ済みメッセージを保持する
    pub fn complete_analysis(&mut self, outcome: Result<DiagnosisResult>) -> Result<()> {
        let image = match std::mem::replace(&mut self.screen, Screen::Landing) {
            Screen::Analyzing { image } => image,
            other => {
                self.screen = other;
                return Err(self.invalid("complete analysis"));
            }
        };

        self.screen = match outcome {
            Ok(result) => {
                info!(disease = result.disease_name(), confidence = result.confidence(), "diagnosis completed");
                Screen::Result { result, image }
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "diagnosis failed");
                Screen::Uploading {
                    error: Some(self.language.analysis_failure_message().to_string()),
                }
            }
        };
        Ok(())
    }

    /// 画像を選択して解析（完了まで待機）
    pub async fn select_image(&mut self, image: EncodedImage) -> Result<AppState> {
        self.begin_analysis(image)?;

        let outcome = match &self.screen {
            Screen::Analyzing { image } => self.provider.analyze(image).await,
            _ => return Err(self.invalid("analyze")),
        };

        self.complete_analysis(outcome)?;
        Ok(self.state())
    }

    /// ファイル選択・ドロップを受け付ける
    ///
    /// ファイル無し・ドロップされた非画像は状態を変えずに無視する。
    /// 読み込みエラーは状態を変えずに返す。
    pub async fn accept_file(&mut self, source: ImageSource, path: Option<&Path>) -> Result<AppState> {
        if !matches!(self.screen, Screen::Uploading { .. }) {
            return Err(self.invalid("select image"));
        }

        match acquisition::acquire(source, path).await? {
            Some(image) => self.select_image(image).await,
            None => Ok(self.state()),
        }
    }

    /// landing に戻る（結果・画像・エラーをすべて破棄）
    ///
    /// 解析中はキャンセルできないため不可
    pub fn reset(&mut self) -> Result<()> {
        if matches!(self.screen, Screen::Analyzing { .. }) {
            return Err(self.invalid("reset"));
        }
        self.screen = Screen::Landing;
        Ok(())
    }

    /// 結果画面のレポート（result 以外では None）
    pub fn report(&self) -> Option<ReportView<'_>> {
        match &self.screen {
            Screen::Result { result, image } => Some(ReportView::new(result, image, self.language)),
            _ => None,
        }
    }

    /// JSON出力（result 以外では何もしない）
    pub fn export_json(&self, output_dir: &Path) -> Result<Option<PathBuf>> {
        match self.result() {
            Some(result) => report::json::export_json(result, output_dir).map(Some),
            None => {
                debug!(state = %self.state(), "no result to export; skipped");
                Ok(None)
            }
        }
    }

    /// PDF出力（レポートが表示されていなければ何もしない）
    pub fn export_document(&self, output_dir: &Path) -> Result<Option<PathBuf>> {
        match self.report() {
            Some(view) => report::pdf::export_pdf(&view, output_dir).map(Some),
            None => {
                debug!(state = %self.state(), "report not mounted; document export skipped");
                Ok(None)
            }
        }
    }
}

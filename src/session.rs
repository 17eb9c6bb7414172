//! 対話モード
//!
//! landing / uploading / analyzing / result の各画面を端末上で順に表示する。
//! 端末に入力・ドロップされたパスはドロップ扱い（画像以外は無視）。

use crate::acquisition::{self, ImageSource};
use crate::app::{App, AppState};
use anyhow::Context;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// uploading 画面での入力
#[derive(Debug, PartialEq, Eq)]
pub enum UploadAction {
    Image(PathBuf),
    Empty,
    Back,
    Quit,
}

pub fn parse_upload_input(input: &str) -> UploadAction {
    match input.trim() {
        "" => UploadAction::Empty,
        "b" | "back" => UploadAction::Back,
        "q" | "quit" => UploadAction::Quit,
        other => acquisition::normalize_dropped_path(other)
            .map(UploadAction::Image)
            .unwrap_or(UploadAction::Empty),
    }
}

/// result 画面のメニュー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    ExportPdf,
    ExportJson,
    NewAnalysis,
    Quit,
}

impl ResultAction {
    pub const ALL: [ResultAction; 4] = [
        ResultAction::ExportPdf,
        ResultAction::ExportJson,
        ResultAction::NewAnalysis,
        ResultAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResultAction::ExportPdf => "📄 PDFレポートをダウンロード",
            ResultAction::ExportJson => "🗂  JSONファイルを保存",
            ResultAction::NewAnalysis => "🔄 新しい診断",
            ResultAction::Quit => "終了",
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub async fn run(app: &mut App, output_dir: &Path) -> anyhow::Result<()> {
    loop {
        match app.state() {
            AppState::Landing => {
                if !landing(app)? {
                    break;
                }
            }
            AppState::Uploading => {
                if !uploading(app).await? {
                    break;
                }
            }
            AppState::Result => {
                if !result_screen(app, output_dir)? {
                    break;
                }
            }
            // select_image の完了を待つので通常ここには来ない
            AppState::Analyzing => anyhow::bail!("unexpected state: {}", app.state()),
        }
    }

    println!("\n👋 終了します");
    Ok(())
}

fn landing(app: &mut App) -> anyhow::Result<bool> {
    println!("\n🌿 plant-doctor - 植物の病害をAIで診断\n");
    println!("   葉や茎の写真から病名・原因・対処法を提示します（応答言語: {}）\n", app.language());

    let choice = Select::new()
        .with_prompt("操作を選択")
        .items(&["診断を開始", "終了"])
        .default(0)
        .interact()?;

    if choice == 0 {
        app.start()?;
        Ok(true)
    } else {
        Ok(false)
    }
}

async fn uploading(app: &mut App) -> anyhow::Result<bool> {
    if let Some(message) = app.error() {
        println!("\n❌ {}", message);
    }

    let input: String = Input::new()
        .with_prompt("画像ファイルのパス（ドラッグ＆ドロップ可、b:戻る q:終了）")
        .allow_empty(true)
        .interact_text()?;

    let path = match parse_upload_input(&input) {
        UploadAction::Image(path) => path,
        UploadAction::Empty => return Ok(true),
        UploadAction::Back => {
            app.reset()?;
            return Ok(true);
        }
        UploadAction::Quit => return Ok(false),
    };

    let image = match acquisition::acquire(ImageSource::Drop, Some(&path)).await {
        Ok(Some(image)) => image,
        Ok(None) => {
            println!("  → 画像ファイルではないため無視しました");
            return Ok(true);
        }
        Err(e) => {
            println!("  → {}", e);
            return Ok(true);
        }
    };

    let pb = spinner("画像を解析中...");
    let state = app.select_image(image).await;
    pb.finish_and_clear();
    state?;

    Ok(true)
}

fn result_screen(app: &mut App, output_dir: &Path) -> anyhow::Result<bool> {
    if let Some(view) = app.report() {
        println!("\n{}\n", view);
    }

    loop {
        let labels: Vec<&str> = ResultAction::ALL.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("操作を選択")
            .items(&labels[..])
            .default(0)
            .interact()?;

        match ResultAction::ALL[choice] {
            ResultAction::ExportPdf => {
                let pb = spinner("PDFを生成中...");
                let written = app.export_document(output_dir);
                pb.finish_and_clear();
                if let Some(path) = written.context("PDFの出力に失敗しました")? {
                    println!("✔ PDF出力: {}", path.display());
                }
            }
            ResultAction::ExportJson => {
                if let Some(path) = app.export_json(output_dir).context("JSONの出力に失敗しました")? {
                    println!("✔ JSON出力: {}", path.display());
                }
            }
            ResultAction::NewAnalysis => {
                app.reset()?;
                return Ok(true);
            }
            ResultAction::Quit => return Ok(false),
        }
    }
}

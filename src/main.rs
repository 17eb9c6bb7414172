use anyhow::Context;
use clap::Parser;
use plant_doctor::acquisition::{self, ImageSource};
use plant_doctor::app::{App, AppState};
use plant_doctor::cli::{Cli, Commands};
use plant_doctor::config::Config;
use plant_doctor::error::PlantDoctorError;
use plant_doctor::report::{self, json, ReportView};
use plant_doctor::{logging, session};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    if let Some(language) = cli.language {
        config.language = language;
    }

    match cli.command {
        Commands::Diagnose { image, export, output } => {
            println!("🌿 plant-doctor - 病害診断\n");

            let provider = cli.ai_provider.build(&config, cli.replay.as_deref())?;
            let mut app = App::new(provider, config.language);
            app.start()?;

            println!("[1/2] 画像を読み込み中...");
            let Some(encoded) = acquisition::acquire(ImageSource::Picker, Some(&image)).await? else {
                anyhow::bail!("画像が選択されていません");
            };
            println!("✔ {} ({})\n", image.display(), encoded.mime_type());

            println!("[2/2] AI解析中...");
            let pb = indicatif::ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(120));
            let state = app.select_image(encoded).await;
            pb.finish_and_clear();

            if state? != AppState::Result {
                let message = app.error().unwrap_or_default().to_string();
                return Err(PlantDoctorError::AnalysisFailed(message).into());
            }
            println!("✔ 解析完了\n");

            if let Some(view) = app.report() {
                println!("{}\n", view);
                if let Some(format) = export {
                    let output_dir = output_dir(output, &config);
                    report::export_report(&view, format, &output_dir)?;
                }
            }

            println!("\n✅ 診断完了");
        }

        Commands::Interactive { output } => {
            let provider = cli.ai_provider.build(&config, cli.replay.as_deref())?;
            let mut app = App::new(provider, config.language);
            session::run(&mut app, &output_dir(output, &config)).await?;
        }

        Commands::Render { input, image, export, output } => {
            println!("📄 plant-doctor - レポート再出力\n");

            let result = json::load_json(&input)
                .with_context(|| format!("診断結果を読み込めません: {}", input.display()))?;
            let encoded = acquisition::read_as_data_url(&image).await?;
            // 見出しは保存された本文の言語に合わせる（--language 指定時はそちら）
            let language = cli.language.unwrap_or_else(|| result.written_language());
            let view = ReportView::new(&result, &encoded, language);
            println!("{}\n", view);

            if let Some(format) = export {
                report::export_report(&view, format, &output_dir(output, &config))?;
                println!("\n✅ エクスポート完了");
            }
        }

        Commands::Config { set_api_key, set_model, set_language, show } => {
            // --language の一時的な上書きは保存しない
            let mut config = Config::load()?;
            let mut changed = false;

            if let Some(key) = set_api_key {
                config.api_key = Some(key);
                changed = true;
                println!("✔ APIキーを設定しました");
            }
            if let Some(model) = set_model {
                println!("✔ モデルを設定しました: {}", model);
                config.model = model;
                changed = true;
            }
            if let Some(language) = set_language {
                config.language = language;
                changed = true;
                println!("✔ 応答言語を設定しました: {}", language);
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  応答言語: {} ({})", config.language, config.language.locale().tag());
                println!(
                    "  タイムアウト: {}",
                    config.timeout_seconds.map(|s| format!("{}秒", s)).unwrap_or_else(|| "なし".into())
                );
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

/// 出力先: 引数 → 設定ファイル → カレント
fn output_dir(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

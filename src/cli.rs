use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use crate::report::ReportFormat;
use plant_doctor_common::Language;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plant-doctor")]
#[command(about = "植物写真AI病害診断・レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (gemini/replay)
    #[arg(long, value_enum, default_value_t = AiProvider::Gemini, global = true)]
    pub ai_provider: AiProvider,

    /// 再生する記録済み応答ファイル（--ai-provider replay 用）
    #[arg(long, global = true)]
    pub replay: Option<PathBuf>,

    /// 応答言語 (persian/english)。省略時は設定ファイルの値（render では保存済み結果の言語）
    #[arg(long, global = true)]
    pub language: Option<Language>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像1枚を診断してレポートを表示
    Diagnose {
        /// 植物の画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 出力形式 (json/pdf/both)。省略時は表示のみ
        #[arg(short, long, value_enum)]
        export: Option<ReportFormat>,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話モード（ファイルパスの入力・ドロップで診断）
    Interactive {
        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存済みJSONからレポートを再表示・再出力
    Render {
        /// 診断結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 診断した画像ファイル
        #[arg(short, long)]
        image: PathBuf,

        /// 出力形式 (json/pdf/both)
        #[arg(short, long, value_enum)]
        export: Option<ReportFormat>,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 応答言語を設定
        #[arg(long)]
        set_language: Option<Language>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diagnose() {
        let cli = Cli::try_parse_from([
            "plant-doctor", "diagnose", "leaf.jpg", "--export", "both", "--language", "english",
        ])
        .unwrap();

        assert_eq!(cli.language, Some(Language::English));
        assert_eq!(cli.ai_provider, AiProvider::Gemini);
        match cli.command {
            Commands::Diagnose { image, export, output } => {
                assert_eq!(image, PathBuf::from("leaf.jpg"));
                assert_eq!(export, Some(ReportFormat::Both));
                assert!(output.is_none());
            }
            _ => panic!("diagnose expected"),
        }
    }

    #[test]
    fn test_parse_replay_provider() {
        let cli = Cli::try_parse_from([
            "plant-doctor", "--ai-provider", "replay", "--replay", "reply.json", "interactive",
        ])
        .unwrap();
        assert_eq!(cli.ai_provider, AiProvider::Replay);
        assert_eq!(cli.replay, Some(PathBuf::from("reply.json")));
    }

    #[test]
    fn test_render_requires_image() {
        assert!(Cli::try_parse_from(["plant-doctor", "render", "diagnosis.json"]).is_err());
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!(Cli::try_parse_from(["plant-doctor", "--language", "klingon", "interactive"]).is_err());
    }
}

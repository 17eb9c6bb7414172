//! tracing初期化
//!
//! RUST_LOG が設定されていればそれを優先する。

use tracing_subscriber::EnvFilter;

pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,plant_doctor=debug,plant_doctor_common=debug"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool) {
    // 標準出力はレポート表示に使うためログはstderrへ
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

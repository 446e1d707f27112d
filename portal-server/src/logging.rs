//! Structured logging setup
//!
//! Console output in development, daily-rolling files under the work
//! directory in production. The `RUST_LOG` filter always wins.

use tracing_subscriber::EnvFilter;

use crate::core::Config;

pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if config.is_production() {
        let log_dir = std::path::PathBuf::from(&config.work_dir).join("logs");
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let appender = tracing_appender::rolling::daily(log_dir, "portal-server");
            builder.with_writer(appender).with_ansi(false).init();
            return;
        }
    }

    builder.init();
}

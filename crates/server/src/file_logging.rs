//! Optional file-based logging via tracing-appender.
//!
//! When `CORKBOARD_FILE_LOGGING` is set, logs are written to rotating daily
//! files in addition to console output. `CORKBOARD_LOG_DIR` overrides the
//! default log directory (`{asset_dir}/logs`).

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use utils::assets::asset_dir;

#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub log_dir: PathBuf,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        let enabled = std::env::var("CORKBOARD_FILE_LOGGING")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let log_dir = std::env::var("CORKBOARD_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| asset_dir().join("logs"));

        Self { enabled, log_dir }
    }
}

/// Initialize the logging system with optional file output.
///
/// The returned guard must be held for the lifetime of the application so
/// buffered logs are flushed on shutdown. Returns None when file logging is
/// disabled.
pub fn init_logging(log_level: &str) -> Option<WorkerGuard> {
    let config = FileLoggingConfig::default();

    let filter_string = format!(
        "warn,server={level},db={level},utils={level},tower_http={level}",
        level = log_level
    );

    let console_layer = tracing_subscriber::fmt::layer()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&filter_string)
        }));

    if !config.enabled {
        tracing_subscriber::registry().with(console_layer).init();
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.log_dir) {
        tracing_subscriber::registry().with(console_layer).init();
        tracing::warn!(
            "Failed to create log directory {:?}: {}. File logging disabled.",
            config.log_dir,
            e
        );
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "corkboard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(EnvFilter::new(&filter_string));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("File logging enabled, writing to {:?}", config.log_dir);
    Some(guard)
}

//! Tracing subscriber with console output and a daily rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;
use crate::error::{AppError, Result};

pub const LOG_FILE_PREFIX: &str = "staff_tracker";
pub const LOG_FILE_SUFFIX: &str = "log";

/// Filter from `RUST_LOG` when set, else the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()))
}

/// Daily log files in `log_dir`, keeping at most `retain_days` of them.
pub fn file_appender(config: &LoggingConfig, log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.retain_days.max(1))
        .build(log_dir)
        .map_err(|e| AppError::config(format!("Cannot open log folder {}: {e}", log_dir.display())))
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output gets flushed.
pub fn init(config: &LoggingConfig, log_dir: &Path) -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(config, log_dir)?);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| AppError::config(format!("Logging already initialized: {e}")))?;

    Ok(guard)
}

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

pub const LOG_FILE_NAME: &str = "estatebook.log";

/// Keeps the background file writer alive; drop it last to flush.
#[must_use = "dropping the guard stops the file log writer"]
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Installs the global subscriber: human readable lines on stderr and JSON
/// lines in a daily rolling file under `<data_dir>/logs`.
///
/// A subscriber that is already installed is left in place.
pub fn init_logging(config: &AppConfig) -> anyhow::Result<LogGuard> {
    let _ = tracing_log::LogTracer::init();

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log directory {}", log_dir.display()))?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .or_else(|_| EnvFilter::try_new("estatebook=info"))
        .context("build log filter")?;

    let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let file_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(file_writer);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(LogGuard { _file: guard })
}

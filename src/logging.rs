//! Tracing setup: a log file under the home directory plus warnings on stderr

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Filter directives for the log file, e.g. `NGXBREW_LOG=ngxbrew=debug`
pub const LOG_ENV: &str = "NGXBREW_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the whole run.
pub fn init(log_path: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path {:?} has no file name", log_path))?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(file_filter());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}

fn file_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_state_dir};

const LOG_FILE: &str = "musicova.log";

/// `--log-dir`, then `logging.directory`, then `<state dir>/logs`.
pub fn resolve_log_dir(cli: Option<&Path>, settings: &LoggingSettings) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| settings.directory.clone())
        .or_else(|| default_state_dir().map(|d| d.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// `RUST_LOG` wins over the configured filter; a bad filter falls back to `info`.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send all tracing output to a daily rolling file. The terminal belongs to
/// the UI, so nothing is written to stdout or stderr.
///
/// The returned guard flushes the writer when dropped; keep it alive.
pub fn init(
    settings: &LoggingSettings,
    cli_dir: Option<&Path>,
) -> Result<WorkerGuard, Box<dyn Error>> {
    let log_dir = resolve_log_dir(cli_dir, settings);
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(build_filter(&settings.filter))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

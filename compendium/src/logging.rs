//! Tracing setup for the CLI.
//!
//! Logs go to stderr so stdout stays clean JSON. When `COMPENDIUM_LOG_DIR` is
//! set, a daily-rolling file in that directory receives the same events.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "warn";
const LOG_FILE_PREFIX: &str = "compendium";

/// Directory for the rolling log file, if one was requested.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("COMPENDIUM_LOG_DIR").ok().map(PathBuf::from)
}

/// Install the global subscriber.
///
/// The returned guard must be held until exit so buffered file output is flushed.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match get_log_dir() {
        Some(dir) => {
            std::fs::create_dir_all(&dir).ok();
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

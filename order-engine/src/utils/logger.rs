//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. A second call is a
/// no-op, so tests and embedding hosts can call this freely.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    let file_appender = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if log_path.exists() {
            Some(tracing_appender::rolling::daily(log_path, "order-engine"))
        } else {
            None
        }
    });

    let result = match (file_appender, json.unwrap_or(false)) {
        (Some(appender), true) => subscriber.json().with_writer(appender).try_init(),
        (Some(appender), false) => subscriber.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => subscriber.json().try_init(),
        (None, false) => subscriber.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}

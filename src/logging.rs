//! Logging initialization.
//!
//! The TUI owns the terminal, so interactive runs log to a file under the
//! data directory. Headless commands log to stderr.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name inside the log directory
const LOG_FILE: &str = "authdesk.log";

/// Filters used when `RUST_LOG` is not set
const FILE_FILTER: &str = "authdesk=info";
const STDERR_FILTER: &str = "authdesk=warn";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to `<log_dir>/authdesk.log`. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init_file(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter(FILE_FILTER))
        .try_init()
        .context("Logging already initialized")?;

    Ok(guard)
}

/// Log to stderr, for headless commands
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).compact())
        .with(env_filter(STDERR_FILTER))
        .try_init();
}

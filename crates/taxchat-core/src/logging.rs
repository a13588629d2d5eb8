//! Diagnostic logging setup.
//!
//! The TUI owns the terminal, so logs go to a rolling file under
//! ${TAXCHAT_HOME}/logs instead of stdout/stderr. `RUST_LOG` overrides the
//! default filter.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when RUST_LOG is not set.
const DEFAULT_FILTER: &str = "taxchat=info";

/// Initializes the global tracing subscriber with a file appender.
///
/// Returns the appender guard; dropping it flushes buffered log lines, so the
/// caller must hold it for the lifetime of the process.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_appender = tracing_appender::rolling::daily(log_dir, "taxchat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(guard)
}

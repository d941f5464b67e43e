//! tracing subscriber setup
//!
//! `RUST_LOG` overrides the default filter when it is set.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::error::{SnapkeepError, SnapkeepResult};

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("snapkeep=debug")
        } else {
            EnvFilter::new("snapkeep=info")
        }
    })
}

/// Log to stderr so command output on stdout stays clean
pub fn init_logging(verbose: bool) -> SnapkeepResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| SnapkeepError::Unexpected(format!("Failed to initialize logging: {}", e)))
}

/// Append plain-text logs to `log_file`
pub fn init_file_logging(log_file: &Path, verbose: bool) -> SnapkeepResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            SnapkeepError::Io(format!(
                "Failed to open log file {}: {}",
                log_file.display(),
                e
            ))
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(file)
        .with_ansi(false)
        .try_init()
        .map_err(|e| SnapkeepError::Unexpected(format!("Failed to initialize logging: {}", e)))
}

// SPDX-License-Identifier: Apache-2.0

//! Logging setup for hosts embedding the printer.

pub mod sensitive;

pub use sensitive::Sensitive;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::error::{PrintError, PrintResult};

const LOG_FILE_PREFIX: &str = "sqlprint.log";
const DEFAULT_FILTER: &str = "sqlprint=info";

/// Where and how printed statements are written
#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// Daily rolling log files in this directory; stderr when `None`
    pub log_dir: Option<PathBuf>,
    /// JSON lines instead of human-readable output
    pub json: bool,
    /// Log files older than this are removed on init
    pub retention_days: u64,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            log_dir: None,
            json: false,
            retention_days: 14,
        }
    }
}

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the
/// default `sqlprint=info` filter.
pub fn init_tracing(options: &TracingOptions) -> PrintResult<()> {
    let mut removed = 0;
    let writer = match &options.log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            removed = cleanup_old_logs(dir, options.retention_days)?;
            BoxMakeWriter::new(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_thread_names(true)
        .with_ansi(options.log_dir.is_none());

    let installed = if options.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| PrintError::config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        log_dir = ?options.log_dir,
        removed_logs = removed,
        "Tracing initialized"
    );
    Ok(())
}

/// Default directory for log files: `<local data dir>/sqlprint/logs`
pub fn default_log_dir() -> PathBuf {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default();
    path.push("sqlprint");
    path.push("logs");
    path
}

/// Removes our log files older than `retention_days`; returns how many went
fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> PrintResult<usize> {
    let now = SystemTime::now();
    let retention = Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60));
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let is_ours = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_ours {
            continue;
        }

        let age = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age > retention) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

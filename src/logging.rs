//! Logging setup.
//!
//! Console output always goes to stderr so stdout stays free for report
//! text. When a log directory is given, a daily rolling file is written
//! there as well.
//!
//! ```no_run
//! use eda_report::logging;
//!
//! let dir = logging::default_log_dir().ok();
//! logging::init(dir.as_deref())?;
//! tracing::info!("ready");
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

const APP_DIR: &str = "eda-report";

/// Platform data directory plus `eda-report/logs`. Nothing is created.
///
/// - Windows: `%APPDATA%/eda-report/logs`
/// - macOS: `~/Library/Application Support/eda-report/logs`
/// - Linux: `~/.local/share/eda-report/logs`
pub fn log_dir_path() -> Option<PathBuf> {
    dirs::data_dir().map(|base| base.join(APP_DIR).join("logs"))
}

/// [`log_dir_path`], created if needed.
pub fn default_log_dir() -> Result<PathBuf> {
    let log_dir = log_dir_path().context("Failed to determine data directory")?;

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }
    Ok(log_dir)
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter.
///
/// # Errors
///
/// Fails if the filter is invalid, the file appender cannot be created or a
/// subscriber is already installed.
pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(10)
                .filename_prefix(APP_DIR)
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create file appender")?;
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_ansi(false)
                    .with_writer(appender),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = log_dir {
        tracing::debug!("Logging to {}", dir.display());
    }
    Ok(())
}

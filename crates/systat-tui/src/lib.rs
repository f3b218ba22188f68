//! Interactive terminal dashboard for `systat`.
//!
//! The [`Aggregator`](systat_core::Aggregator) runs in a background task
//! and feeds snapshots and probe results into a single event loop
//! through the data bridge. The loop owns all dashboard state; panels
//! render from it and nothing else.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod fmt;
mod input;
mod layout;
mod panels;
mod state;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};

use systat_core::MonitorConfig;

pub use layout::MIN_COLUMN_WIDTH;

const LOG_FILE_NAME: &str = "systat-dashboard.log";

/// Everything the dashboard needs from the command line.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub monitor: MonitorConfig,
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log to this file instead of the daily rolling log.
    pub log_file: Option<PathBuf>,
}

/// Take over the terminal and run the dashboard until the user quits.
pub async fn run(options: DashboardOptions) -> Result<()> {
    tui::install_hooks()?;
    let _log_guard = init_logging(&options.log_level, options.log_file.as_deref())?;

    info!(
        refresh_ms = options.monitor.refresh_interval.as_millis(),
        probes = options.monitor.probes.len(),
        "starting dashboard"
    );

    let mut app = app::App::new(options.monitor);
    app.run().await
}

/// Route tracing output to a file; the terminal belongs to the UI.
///
/// Hold the returned guard for the session so buffered lines flush.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<WorkerGuard> {
    let appender = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new(LOG_FILE_NAME));
            tracing_appender::rolling::never(dir, name)
        }
        None => {
            let dir = systat_config::log_dir();
            std::fs::create_dir_all(&dir)
                .wrap_err_with(|| format!("cannot create log directory {}", dir.display()))?;
            tracing_appender::rolling::daily(dir, LOG_FILE_NAME)
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            log_fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .wrap_err("tracing subscriber already installed")?;

    Ok(guard)
}

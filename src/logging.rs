// src/logging.rs
//! Tracing setup

use std::{
    fs,
    path::Path,
};

use anyhow::{
    Context,
    Result,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt,
    prelude::*,
};

use crate::config::LogConfig;

pub const LOG_ENV: &str = "PAMDEBUG_LOG";
const LOG_FILE: &str = "pamdebug.log";

/// Picks the filter from `PAMDEBUG_LOG`, falling back to the configured level
pub fn filter(cfg: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&cfg.level))
}

/// Installs a file subscriber in `cfg.dir`, creating it and any missing parents
///
/// Nothing is logged to stdout. Keep the returned guard alive or buffered lines are lost.
pub fn init(cfg: &LogConfig) -> Result<WorkerGuard> {
    let dir = Path::new(&cfg.dir);
    fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter(cfg))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

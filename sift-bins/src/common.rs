//! Common utilities for all binaries
//!
//! Shared initialization and CLI parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CLI arguments for the day runner.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct DayArgs {
    /// Directory holding the day's raw tick files (*.csv)
    #[arg(short, long)]
    pub tick_dir: PathBuf,

    /// Trading date to process, e.g. 20251231
    #[arg(short, long)]
    pub date: String,

    /// Near-term PROD schedule file
    #[arg(long)]
    pub near_schedule: PathBuf,

    /// Next-term PROD schedule file
    #[arg(long)]
    pub next_schedule: PathBuf,

    /// Output directory for the per-term reports
    #[arg(short, long, default_value = "out")]
    pub output_dir: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit JSON logs instead of the human-readable format
    #[arg(long)]
    pub json_logs: bool,
}

/// Initialize tracing/logging
pub fn init_logging(level: &str, json_logs: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    if json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

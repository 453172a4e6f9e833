//! Batch day runner.
//!
//! Loads a day of raw ticks, splits the two nearest expiry terms, runs the
//! filtering pipeline once per term against its schedule, and writes one
//! report per term.

use anyhow::{Context, Result};
use clap::Parser;
use sift_bins::common::{init_logging, DayArgs};
use sift_core::data::{Tick, TickStore};
use sift_core::pipeline::DayRun;
use sift_io::{report, schedule_file, tick_file};

fn main() -> Result<()> {
    let args = DayArgs::parse();
    init_logging(&args.log_level, args.json_logs)?;

    tracing::info!("=== Sift: day runner ===");
    tracing::info!("date: {}", args.date);

    let day = tick_file::load_dir(&args.tick_dir, &args.date)
        .with_context(|| format!("loading ticks from {}", args.tick_dir.display()))?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;

    run_term("near", day.near_term, day.near, &args, &args.near_schedule)?;
    run_term("next", day.next_term, day.next, &args, &args.next_schedule)?;

    tracing::info!("done");
    Ok(())
}

fn run_term(
    label: &str,
    expiry: u32,
    ticks: Vec<Tick>,
    args: &DayArgs,
    schedule_path: &std::path::Path,
) -> Result<()> {
    tracing::info!("--- {} term ({}) ---", label, expiry);

    let schedule = schedule_file::load(schedule_path)
        .with_context(|| format!("loading schedule {}", schedule_path.display()))?;
    let store = TickStore::from_ticks(ticks).context("building tick store")?;
    tracing::info!(
        ticks = store.len(),
        products = store.product_count(),
        snapshots = schedule.len(),
        "inputs ready"
    );

    let (rows, stats) = DayRun::new(&store, &schedule).run();
    tracing::info!(
        rows = stats.rows_emitted,
        ticks = stats.ticks_processed,
        products = stats.products_observed,
        "{} term complete",
        label
    );

    let out_path = args
        .output_dir
        .join(format!("{}PROD_{}.tsv", capitalize(label), args.date));
    report::write(&out_path, &rows)
        .with_context(|| format!("writing {}", out_path.display()))?;

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

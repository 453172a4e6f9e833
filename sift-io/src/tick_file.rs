//! Raw tick-file ingestion.
//!
//! Tick files are tab-separated with one best-bid/ask update per line and
//! the `svel_i081_*` header set. A day's data may span several files; rows
//! are date-filtered, symbol-decoded, split into near/next term, and sorted
//! by seq before they reach the store (the store re-checks strictness).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sift_core::data::Tick;
use tracing::{debug, info, warn};

use crate::errors::LoadError;
use crate::symbols::{decode_symbol, near_next_terms};

#[derive(Debug, Deserialize)]
struct RawTickRow {
    #[serde(rename = "svel_i081_yymmdd")]
    date: String,
    #[serde(rename = "svel_i081_prod_id")]
    prod_id: String,
    #[serde(rename = "svel_i081_time")]
    time: String,
    #[serde(rename = "svel_i081_best_buy_price1")]
    bid: f64,
    #[serde(rename = "svel_i081_best_sell_price1")]
    ask: f64,
    #[serde(rename = "svel_i081_seqno")]
    seq: u64,
}

/// One day of ticks, split by expiry term.
#[derive(Debug)]
pub struct DayTicks {
    pub near_term: u32,
    pub next_term: u32,
    pub near: Vec<Tick>,
    pub next: Vec<Tick>,
}

/// Load every `*.csv` file in `dir`, keeping only rows dated `target_date`.
pub fn load_dir(dir: &Path, target_date: &str) -> Result<DayTicks, LoadError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("csv"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(LoadError::NoTickFiles { dir: dir.to_path_buf() });
    }
    info!(files = files.len(), dir = %dir.display(), "loading tick files");

    let mut decoded: Vec<(Tick, u32)> = Vec::new();
    for file in &files {
        let before = decoded.len();
        load_file(file, target_date, &mut decoded)?;
        debug!(file = %file.display(), rows = decoded.len() - before, "loaded");
    }

    split_terms(decoded)
}

/// Load a single tick file into `out`.
pub fn load_file(
    path: &Path,
    target_date: &str,
    out: &mut Vec<(Tick, u32)>,
) -> Result<(), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut dropped_date = 0usize;
    let mut dropped_symbol = 0usize;
    for row in reader.deserialize::<RawTickRow>() {
        let row = row?;
        if row.date != target_date {
            dropped_date += 1;
            continue;
        }
        let Some(parsed) = decode_symbol(&row.prod_id) else {
            dropped_symbol += 1;
            continue;
        };
        out.push((
            Tick::new(row.seq, parsed.key, row.bid, row.ask, row.time),
            parsed.expiry,
        ));
    }

    if dropped_date > 0 || dropped_symbol > 0 {
        warn!(
            file = %path.display(),
            off_date = dropped_date,
            undecodable = dropped_symbol,
            "dropped rows"
        );
    }
    Ok(())
}

/// Split decoded ticks into the two nearest expiry terms, seq-sorted.
pub fn split_terms(mut decoded: Vec<(Tick, u32)>) -> Result<DayTicks, LoadError> {
    let (near_term, next_term) = near_next_terms(decoded.iter().map(|(_, e)| *e))?;

    decoded.sort_by_key(|(t, _)| t.seq);

    let mut near = Vec::new();
    let mut next = Vec::new();
    for (tick, expiry) in decoded {
        if expiry == near_term {
            near.push(tick);
        } else if expiry == next_term {
            next.push(tick);
        }
        // Farther expiries exist in the raw feed but are out of scope.
    }

    info!(
        near_term,
        next_term,
        near_ticks = near.len(),
        next_ticks = next.len(),
        "terms split"
    );
    Ok(DayTicks { near_term, next_term, near, next })
}

//! Snapshot-schedule extraction from PROD files.
//!
//! A PROD file starts with a tab-separated header, then one "start" row
//! carrying the pre-session time and boot seq cap, then data rows, one per
//! strike per snapshot time. Only the `time` and `snapshot_sysID` columns
//! matter here; repeated times collapse to the first occurrence.

use std::io::{BufRead, BufReader};
use std::path::Path;

use sift_core::schedule::Schedule;
use tracing::info;

use crate::errors::LoadError;

/// Load the snapshot schedule from a PROD file.
pub fn load(path: &Path) -> Result<Schedule, LoadError> {
    let file = std::fs::File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines.next().transpose()?.unwrap_or_default();
    let columns: Vec<&str> = header.trim_end().split('\t').collect();
    let time_idx = find_column(&columns, "time", path)?;
    let sys_id_idx = find_column(&columns, "snapshot_sysID", path)?;

    // Start row: "<time>\t<boot seq cap>", time possibly missing its
    // leading zero.
    let start_line = lines.next().transpose()?.unwrap_or_default();
    let start: Vec<&str> = start_line.trim_end().split('\t').collect();
    if start.len() < 2 {
        return Err(LoadError::BadStartRow {
            path: path.to_path_buf(),
            line: start_line.clone(),
        });
    }
    let boot_seq_cap = parse_u64(start[1], path)?;

    let mut points: Vec<(String, u64)> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for line in lines {
        let line = line?;
        let parts: Vec<&str> = line.trim_end().split('\t').collect();
        if parts.len() <= time_idx.max(sys_id_idx) {
            continue;
        }
        let time_key = pad_time(parts[time_idx].trim());
        if time_key.is_empty() || !seen.insert(time_key.clone()) {
            continue;
        }
        let seq_cap = parse_u64(parts[sys_id_idx].trim(), path)?;
        points.push((time_key, seq_cap));
    }

    info!(path = %path.display(), snapshots = points.len(), boot_seq_cap, "schedule loaded");
    Ok(Schedule::new(boot_seq_cap, points)?)
}

fn find_column(columns: &[&str], name: &'static str, path: &Path) -> Result<usize, LoadError> {
    columns
        .iter()
        .position(|&c| c.trim() == name)
        .ok_or_else(|| LoadError::MissingColumn { path: path.to_path_buf(), name })
}

fn parse_u64(value: &str, path: &Path) -> Result<u64, LoadError> {
    value.parse().map_err(|_| LoadError::BadNumber {
        path: path.to_path_buf(),
        value: value.to_string(),
    })
}

/// Zero-pad a time key to six digits ("84500" -> "084500").
fn pad_time(raw: &str) -> String {
    if raw.is_empty() || raw.len() >= 6 {
        raw.to_string()
    } else {
        format!("{:0>6}", raw)
    }
}

//! Snapshot-row report writer.
//!
//! Writes one tab-separated row per `(time, strike)` with the PROD-style
//! column set. Fills for absent values (zeroes, default gamma, `-` tags)
//! are applied by the row's flatten step.

use std::path::Path;

use sift_core::SnapshotRow;
use tracing::info;

use crate::errors::LoadError;

/// Write all rows to `path`, tab-separated, with a header row.
pub fn write(path: &Path, rows: &[SnapshotRow]) -> Result<(), LoadError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    for row in rows {
        writer.serialize(row.flatten())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    info!(path = %path.display(), rows = rows.len(), "report written");
    Ok(())
}

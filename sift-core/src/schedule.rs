//! Snapshot schedule.
//!
//! A schedule is a finite ordered list of snapshot points. Each point caps
//! the tick seq range considered at that snapshot; the previous point's cap
//! anchors the interval used for min-spread selection. The first point is
//! anchored by a pre-session boot cap supplied by the schedule source.

use serde::{Deserialize, Serialize};

use crate::errors::ShapeError;

/// Time key of the market-open snapshot. When a schedule crosses it, the
/// per-product EMA and previous-filtered-quote state are reset so pre-open
/// history does not leak into the regular session.
pub const OPEN_RESET_TIME: &str = "090000";

/// One scheduled snapshot point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSpec {
    /// Opaque human-readable label, e.g. `"084515"`. Kept as-is for parity
    /// with golden files; only ever compared for equality.
    pub time_key: String,
    /// Inclusive upper bound on tick seqs considered at this snapshot.
    pub seq_cap: u64,
    /// Inclusive lower anchor: the previous snapshot's cap, or the boot cap.
    pub prev_seq_cap: u64,
}

impl SnapshotSpec {
    /// Whether this snapshot triggers the market-open state reset.
    #[inline]
    pub fn is_open_reset(&self) -> bool {
        self.time_key == OPEN_RESET_TIME
    }
}

/// Validated, ordered snapshot schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    snapshots: Vec<SnapshotSpec>,
}

impl Schedule {
    /// Build a schedule from the boot cap and the ordered snapshot points.
    ///
    /// Seq caps must be strictly increasing and the boot cap must lie below
    /// the first snapshot's cap; violations are fatal.
    pub fn new(
        boot_seq_cap: u64,
        points: impl IntoIterator<Item = (String, u64)>,
    ) -> Result<Self, ShapeError> {
        let mut snapshots = Vec::new();
        let mut prev_cap = boot_seq_cap;

        for (index, (time_key, seq_cap)) in points.into_iter().enumerate() {
            if index == 0 && seq_cap <= boot_seq_cap {
                return Err(ShapeError::BootAnchorTooHigh {
                    boot: boot_seq_cap,
                    first_cap: seq_cap,
                });
            }
            if index > 0 && seq_cap <= prev_cap {
                return Err(ShapeError::NonMonotoneSchedule {
                    index,
                    prev_cap,
                    cap: seq_cap,
                });
            }
            snapshots.push(SnapshotSpec {
                time_key,
                seq_cap,
                prev_seq_cap: prev_cap,
            });
            prev_cap = seq_cap;
        }

        Ok(Self { snapshots })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SnapshotSpec> {
        self.snapshots.get(index)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &SnapshotSpec> {
        self.snapshots.iter()
    }
}

//! Fatal input-shape errors.
//!
//! Only invariant violations on the inputs surface as errors; everything
//! else the pipeline can express in the emitted rows (absent fields,
//! replacement source, outlier tags).

use thiserror::Error;

/// The inputs violate an ordering invariant; the pipeline refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("tick stream not strictly seq-sorted at index {index}: {prev_seq} then {seq}")]
    UnsortedTicks { index: usize, prev_seq: u64, seq: u64 },

    #[error("schedule seq caps not strictly increasing at snapshot {index}: {prev_cap} then {cap}")]
    NonMonotoneSchedule { index: usize, prev_cap: u64, cap: u64 },

    #[error("boot seq cap {boot} is not below the first snapshot cap {first_cap}")]
    BootAnchorTooHigh { boot: u64, first_cap: u64 },
}

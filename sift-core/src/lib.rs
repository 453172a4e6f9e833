//! Sift Core - Snapshot Quote Filtering for Index Options
//!
//! Sift replays a day of best-bid/ask ticks for a single underlying's listed
//! option strikes and produces, at every scheduled snapshot time, one
//! *filtered quote* per strike and side. The filtered quotes feed a
//! downstream volatility-index calculation; this crate covers the filtering
//! pipeline only.
//!
//! ## Architecture
//! - **Single pass** over the tick stream, driven by the snapshot schedule
//! - **Deterministic**: output is a pure function of (ticks, schedule)
//! - **Dense per-product state** indexed by compacted product ids
//! - **No I/O**: loaders and report writers live in `sift-io`
//!
//! ## Core Modules
//! - `data`: tick/quote types, the validity predicate, the tick store
//! - `schedule`: validated snapshot schedule with the market-open sentinel
//! - `replay`: order-book reconstruction (latest pick, min-spread pick)
//! - `filter`: per-product EMA / outlier / replacement state machine
//! - `output`: per-strike row assembly with call/put side merging
//! - `pipeline`: the outer snapshot loop tying everything together

pub mod data;
pub mod errors;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod replay;
pub mod schedule;

// Re-export the types most callers touch
pub use data::{ProductKey, Quote, QuoteAt, Side, Tick, TickStore};
pub use errors::ShapeError;
pub use filter::{FilterOutcome, FilterState, SourceTag};
pub use output::{SideOutput, SnapshotRow};
pub use pipeline::{DayRun, PipelineStats};
pub use schedule::{Schedule, SnapshotSpec, OPEN_RESET_TIME};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::data::{ProductKey, Quote, QuoteAt, Side, Tick, TickStore};
    pub use crate::errors::ShapeError;
    pub use crate::pipeline::{DayRun, PipelineStats};
    pub use crate::schedule::{Schedule, SnapshotSpec};
}

//! Sift IO - Loaders and report writing around the core pipeline.
//!
//! The core consumes in-memory ticks and schedules; this crate produces
//! them from the exchange file formats and writes the per-day report:
//!
//! - `symbols`: product-id decoding and near/next term inference
//! - `tick_file`: raw tick TSV ingestion with strict date filtering
//! - `schedule_file`: snapshot schedule extraction from PROD files
//! - `report`: snapshot-row TSV output

pub mod errors;
pub mod report;
pub mod schedule_file;
pub mod symbols;
pub mod tick_file;

pub use errors::LoadError;
pub use symbols::{decode_symbol, ParsedSymbol};
pub use tick_file::DayTicks;

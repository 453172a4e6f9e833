//! The single-pass day pipeline.
//!
//! Outer loop over snapshots in schedule order; inner loop over ticks in seq
//! order up to each snapshot's cap; then per-product filtering and row
//! assembly. The result is a pure function of the tick stream and the
//! schedule. Input-shape violations are rejected when the store and schedule
//! are built, so the run itself cannot fail.

use tracing::{debug, info};

use crate::data::TickStore;
use crate::filter::FilterState;
use crate::output::{self, SideOutput, SnapshotRow};
use crate::replay::Reconstructor;
use crate::schedule::Schedule;

/// Counters for the day-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub snapshots: usize,
    pub ticks_processed: usize,
    pub products_observed: usize,
    pub rows_emitted: usize,
}

/// One day's run over a tick store and a schedule.
pub struct DayRun<'a> {
    store: &'a TickStore,
    schedule: &'a Schedule,
}

impl<'a> DayRun<'a> {
    pub fn new(store: &'a TickStore, schedule: &'a Schedule) -> Self {
        Self { store, schedule }
    }

    /// Run the full day, returning all rows and the summary counters.
    pub fn run(&self) -> (Vec<SnapshotRow>, PipelineStats) {
        let mut recon = Reconstructor::new(self.store);
        let mut filters: Vec<FilterState> =
            vec![FilterState::new(); self.store.product_count()];
        let mut rows = Vec::new();

        for (index, spec) in self.schedule.iter().enumerate() {
            if spec.is_open_reset() {
                debug!(time = %spec.time_key, "market-open reset");
                for state in &mut filters {
                    state.reset();
                }
            }
            let fresh = index == 0 || spec.is_open_reset();

            let records = recon.snapshot(self.store, index as u32, spec.seq_cap);
            debug!(
                time = %spec.time_key,
                seq_cap = spec.seq_cap,
                products = records.len(),
                "snapshot"
            );

            let sides = records.iter().map(|record| {
                let state = &mut filters[record.product as usize];
                let outcome = state.step(
                    fresh,
                    record.last_valid.as_ref(),
                    record.min.as_ref(),
                );
                (
                    self.store.product_key(record.product),
                    SideOutput::from_parts(record, &outcome),
                )
            });

            rows.extend(output::assemble(&spec.time_key, spec.seq_cap, sides));
        }

        let stats = PipelineStats {
            snapshots: self.schedule.len(),
            ticks_processed: recon.ticks_processed(),
            products_observed: recon.products_observed(),
            rows_emitted: rows.len(),
        };
        info!(
            snapshots = stats.snapshots,
            ticks = stats.ticks_processed,
            products = stats.products_observed,
            rows = stats.rows_emitted,
            "day run complete"
        );
        (rows, stats)
    }
}

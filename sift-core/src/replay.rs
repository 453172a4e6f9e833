//! Order-book reconstruction.
//!
//! The reconstructor consumes the global tick stream exactly once, in seq
//! order, and produces one record per observed product at every snapshot:
//!
//! - the **latest pick**: the product's most recent raw quote, plus the
//!   sticky latest *valid* quote (never cleared by a later invalid tick);
//! - the **min-spread pick**: among the product's valid ticks in the
//!   snapshot interval, the one with the smallest spread, ties broken
//!   toward the larger seq within an absolute tolerance.
//!
//! The interval for snapshot `k` runs from the product's last tick at or
//! under the previous snapshot's cap (inclusive) to its last tick at or
//! under this snapshot's cap. Streaming in seq order makes the lower anchor
//! implicit: the boundary tick is whatever the product's raw quote was when
//! the interval is armed.

use crate::data::{ProductId, QuoteAt, TickStore, PRICE_EPS};

/// Per-product, per-snapshot reconstruction record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductRecord {
    pub product: ProductId,
    /// Most recent tick at or under the snapshot cap, valid or not.
    pub last_raw: Option<QuoteAt>,
    /// Most recent *valid* tick; sticky across snapshots.
    pub last_valid: Option<QuoteAt>,
    /// Min-spread pick over the snapshot interval, if any valid candidate
    /// existed (including the prior-valid fallback).
    pub min: Option<QuoteAt>,
}

/// Observed-tick state for one product.
#[derive(Debug, Clone)]
struct ProductCursor {
    last_raw: Option<QuoteAt>,
    last_valid: Option<QuoteAt>,
    /// Snapshot index the interval tracker was last armed for.
    interval_epoch: u32,
    /// Best min-spread candidate within the current interval.
    best: Option<QuoteAt>,
}

const UNARMED: u32 = u32::MAX;

impl ProductCursor {
    fn new() -> Self {
        Self {
            last_raw: None,
            last_valid: None,
            interval_epoch: UNARMED,
            best: None,
        }
    }

    /// Start a fresh interval for `epoch`, seeding it with the boundary
    /// tick (the product's current raw quote) when that tick is valid.
    fn arm_interval(&mut self, epoch: u32) {
        if self.interval_epoch == epoch {
            return;
        }
        self.interval_epoch = epoch;
        self.best = None;
        if let Some(boundary) = self.last_raw {
            if boundary.quote.is_valid() {
                self.best = Some(boundary);
            }
        }
    }

    /// Apply one tick of this product, arming the interval first so the
    /// previous boundary tick stays a candidate.
    fn observe(&mut self, epoch: u32, tick: QuoteAt) {
        self.arm_interval(epoch);
        self.last_raw = Some(tick);
        if tick.quote.is_valid() {
            self.last_valid = Some(tick);
            self.offer(tick);
        }
    }

    /// Offer a valid candidate to the min-spread tracker.
    ///
    /// Candidates arrive in ascending seq, so replacing on a within-
    /// tolerance tie implements the larger-seq tie-break, and the latest
    /// valid tick wins any tie it participates in.
    fn offer(&mut self, candidate: QuoteAt) {
        match self.best {
            None => self.best = Some(candidate),
            Some(best) => {
                if candidate.spread() <= best.spread() + PRICE_EPS {
                    self.best = Some(candidate);
                }
            }
        }
    }

    /// Min-spread pick for the armed interval.
    ///
    /// With no valid tick in the interval, the prior latest-valid quote is
    /// a fallback candidate, provided its spread is finite.
    fn min_pick(&self) -> Option<QuoteAt> {
        self.best
            .or_else(|| self.last_valid.filter(|lv| lv.spread().is_finite()))
    }
}

/// Streams the tick store across the snapshot schedule.
#[derive(Debug, Default)]
pub struct Reconstructor {
    products: Vec<ProductCursor>,
    /// Next unconsumed index into the global tick array.
    cursor: usize,
    /// Products observed so far. Dense ids are assigned in first-tick order,
    /// so this is a plain watermark.
    observed: usize,
}

impl Reconstructor {
    pub fn new(store: &TickStore) -> Self {
        Self {
            products: vec![ProductCursor::new(); store.product_count()],
            cursor: 0,
            observed: 0,
        }
    }

    /// Ticks consumed so far.
    #[inline]
    pub fn ticks_processed(&self) -> usize {
        self.cursor
    }

    /// Products observed so far.
    #[inline]
    pub fn products_observed(&self) -> usize {
        self.observed
    }

    /// Consume ticks up to `seq_cap` and emit one record per observed
    /// product, in dense-id (first observation) order.
    pub fn snapshot(&mut self, store: &TickStore, index: u32, seq_cap: u64) -> Vec<ProductRecord> {
        let ticks = store.ticks();
        while self.cursor < ticks.len() && ticks[self.cursor].seq <= seq_cap {
            let tick = &ticks[self.cursor];
            let pid = tick.product as usize;
            self.products[pid].observe(index, QuoteAt::new(tick.bid, tick.ask, tick.seq));
            if pid >= self.observed {
                self.observed = pid + 1;
            }
            self.cursor += 1;
        }

        let mut records = Vec::with_capacity(self.observed);
        for pid in 0..self.observed {
            let state = &mut self.products[pid];
            // Products with no ticks this snapshot still need their
            // interval armed: it collapses to the boundary tick alone.
            state.arm_interval(index);
            records.push(ProductRecord {
                product: pid as ProductId,
                last_raw: state.last_raw,
                last_valid: state.last_valid,
                min: state.min_pick(),
            });
        }
        records
    }
}

//! Per-product EMA / outlier / replacement state machine.
//!
//! Each product carries two pieces of state across snapshots: the previous
//! filtered quote and the previous spread EMA. At every snapshot the machine
//! consumes the reconstructor's two candidates (latest-valid and min-spread),
//! classifies each against the EMA band, and picks the filtered quote by a
//! strict priority: latest-valid, then min-spread, then the previous
//! filtered quote as replacement.
//!
//! Classification runs against the EMA carried *into* the snapshot; the EMA
//! blended with the current interval spread is what the row reports and what
//! the next snapshot classifies against.

pub mod ema;
pub mod gamma;
pub mod outlier;

use crate::data::{Quote, QuoteAt};
pub use outlier::OutlierClass;

/// EMA smoothing weight on the previous value.
pub const ALPHA: f64 = 0.95;
/// Tolerance multiplier when the previous filtered bid is absent or zero.
pub const GAMMA_0: f64 = 1.2;
/// Tolerance multiplier when the candidate mid is at or under the previous
/// filtered mid.
pub const GAMMA_1: f64 = 1.5;
/// Tolerance multiplier when the candidate mid is above the previous
/// filtered mid (and on the first post-reset snapshot).
pub const GAMMA_2: f64 = 2.0;
/// Absolute spread ceiling, in points. Any spread at or under this is
/// automatically non-outlier.
pub const LAMBDA: f64 = 15.0;

/// Which candidate the filtered quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTag {
    LastValid,
    MinValid,
    Replacement,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::LastValid => "LastValid",
            SourceTag::MinValid => "MinValid",
            SourceTag::Replacement => "Replacement",
        }
    }
}

/// Everything the filter emits for one product at one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOutcome {
    /// The filtered quote; absent when falling back to a replacement that
    /// does not exist yet.
    pub q_hat: Option<Quote>,
    pub source: SourceTag,
    /// Updated spread EMA.
    pub ema: Option<f64>,
    /// The tolerance multiplier reported for the chosen quote.
    pub gamma: f64,
    pub last_class: OutlierClass,
    pub min_class: OutlierClass,
}

/// Per-product filter state, living for one trading day.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    ema_prev: Option<f64>,
    q_hat_prev: Option<Quote>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Market-open reset: pre-open EMA and filtered-quote history are
    /// discarded before the snapshot is processed.
    pub fn reset(&mut self) {
        self.ema_prev = None;
        self.q_hat_prev = None;
    }

    /// Previous filtered quote, if any.
    #[inline]
    pub fn q_hat_prev(&self) -> Option<Quote> {
        self.q_hat_prev
    }

    /// EMA carried into the next snapshot, if any.
    #[inline]
    pub fn ema_prev(&self) -> Option<f64> {
        self.ema_prev
    }

    /// Run one snapshot for this product.
    ///
    /// `fresh` marks the first snapshot after a state reset (the boot
    /// snapshot or the market-open snapshot); it only affects the gamma
    /// fallback when the previous filtered mid is absent.
    pub fn step(
        &mut self,
        fresh: bool,
        q_last: Option<&QuoteAt>,
        q_min: Option<&QuoteAt>,
    ) -> FilterOutcome {
        let prior_ema = self.ema_prev;
        let prev_mid = self.q_hat_prev.as_ref().map(Quote::mid);

        let s_k = q_min.map(QuoteAt::spread).filter(|s| s.is_finite());
        let ema_k = ema::update(prior_ema, s_k);

        let gamma_last = gamma::select(q_last.map(|q| &q.quote), prev_mid, fresh);
        let gamma_min = gamma::select(q_min.map(|q| &q.quote), prev_mid, fresh);

        let last_class = outlier::classify(q_last, gamma_last, prior_ema, prev_mid);
        let min_class = outlier::classify(q_min, gamma_min, prior_ema, prev_mid);

        let eligible = |q: Option<&QuoteAt>, class: OutlierClass| {
            q.is_some_and(|q| q.quote.is_two_sided()) && class.is_non_outlier()
        };

        let (q_hat, source, gamma) = if eligible(q_last, last_class) {
            (Some(q_last.unwrap().quote), SourceTag::LastValid, gamma_last)
        } else if eligible(q_min, min_class) {
            (Some(q_min.unwrap().quote), SourceTag::MinValid, gamma_min)
        } else {
            let reported = if q_min.is_some() { gamma_min } else { gamma_last };
            (self.q_hat_prev, SourceTag::Replacement, reported)
        };

        self.ema_prev = ema_k;
        if let Some(q) = q_hat {
            self.q_hat_prev = Some(q);
        }

        FilterOutcome {
            q_hat,
            source,
            ema: ema_k,
            gamma,
            last_class,
            min_class,
        }
    }
}

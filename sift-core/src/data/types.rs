//! Core data types for the filtering pipeline.
//!
//! A [`Tick`] is one best-bid/ask update for one product. Products are
//! identified by strike and side; expiry-month separation happens upstream
//! in the loaders, so a store only ever holds one expiry term.

use serde::{Deserialize, Serialize};

/// Absolute tolerance for spread-tie and mid comparisons.
///
/// Two spreads (or a mid against the previous filtered mid) closer than this
/// are treated as equal so that a numerically-smaller-but-visually-equal
/// candidate cannot win a tie.
pub const PRICE_EPS: f64 = 1e-9;

/// Option side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Call,
    Put,
}

impl Side {
    /// Column prefix used in report output ("c" / "p").
    #[inline]
    pub fn prefix(self) -> &'static str {
        match self {
            Side::Call => "c",
            Side::Put => "p",
        }
    }
}

/// Identity of one listed series: strike price and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub strike: u32,
    pub side: Side,
}

impl ProductKey {
    #[inline]
    pub fn new(strike: u32, side: Side) -> Self {
        Self { strike, side }
    }
}

/// A best-bid/ask pair. Zero on either side means "no side quoted".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    #[inline]
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    /// Bid/ask spread.
    ///
    /// Defined only when both sides are quoted and the book is not crossed;
    /// otherwise the sentinel `+inf`, which keeps the tick out of min-spread
    /// selection and the EMA.
    #[inline]
    pub fn spread(&self) -> f64 {
        if self.bid > 0.0 && self.ask > 0.0 && self.ask > self.bid {
            self.ask - self.bid
        } else {
            f64::INFINITY
        }
    }

    /// Midpoint of bid and ask.
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Both sides actually quoted (zero is the no-quote sentinel).
    #[inline]
    pub fn is_two_sided(&self) -> bool {
        self.bid > 0.0 && self.ask > 0.0
    }

    /// Validity per the pipeline's gating predicate.
    #[inline]
    pub fn is_valid(&self) -> bool {
        super::validator::is_valid(self.bid, self.ask)
    }
}

/// A quote pinned to the tick sequence number it was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteAt {
    pub quote: Quote,
    pub seq: u64,
}

impl QuoteAt {
    #[inline]
    pub fn new(bid: f64, ask: f64, seq: u64) -> Self {
        Self {
            quote: Quote::new(bid, ask),
            seq,
        }
    }

    #[inline]
    pub fn spread(&self) -> f64 {
        self.quote.spread()
    }

    #[inline]
    pub fn mid(&self) -> f64 {
        self.quote.mid()
    }
}

/// One raw tick update as handed over by the loaders.
///
/// `seq` is globally unique and strictly increasing within a day; it is the
/// sole ordering key. `time_raw` is the exchange wall-clock stamp, preserved
/// for diagnostics but never used for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub seq: u64,
    pub product: ProductKey,
    pub bid: f64,
    pub ask: f64,
    pub time_raw: String,
}

impl Tick {
    pub fn new(seq: u64, product: ProductKey, bid: f64, ask: f64, time_raw: impl Into<String>) -> Self {
        Self {
            seq,
            product,
            bid,
            ask,
            time_raw: time_raw.into(),
        }
    }

    #[inline]
    pub fn quote(&self) -> Quote {
        Quote::new(self.bid, self.ask)
    }
}

//! Centralized quote-validity rules.
//!
//! A quote participates in filtering only if it passes this predicate:
//! - both sides are numeric (no NaN, no infinities),
//! - the bid is non-negative,
//! - the ask is strictly above the bid.
//!
//! A zero bid with a positive ask is valid (deep out-of-the-money series
//! quote only the ask). Both sides zero is invalid.

use thiserror::Error;

/// Why a quote failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuoteDefect {
    #[error("bid or ask is not a finite number (bid={bid}, ask={ask})")]
    NonNumeric { bid: f64, ask: f64 },

    #[error("bid {bid} is negative")]
    NegativeBid { bid: f64 },

    #[error("ask {ask} is not above bid {bid}")]
    AskNotAboveBid { bid: f64, ask: f64 },
}

/// Validate a bid/ask pair.
pub fn validate(bid: f64, ask: f64) -> Result<(), QuoteDefect> {
    if !bid.is_finite() || !ask.is_finite() {
        return Err(QuoteDefect::NonNumeric { bid, ask });
    }
    if bid < 0.0 {
        return Err(QuoteDefect::NegativeBid { bid });
    }
    if ask <= bid {
        return Err(QuoteDefect::AskNotAboveBid { bid, ask });
    }
    Ok(())
}

/// Quick validity check (boolean instead of Result).
#[inline]
pub fn is_valid(bid: f64, ask: f64) -> bool {
    bid.is_finite() && ask.is_finite() && bid >= 0.0 && ask > bid
}

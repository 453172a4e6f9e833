//! Tolerance-multiplier selection.
//!
//! The outlier band width is `gamma * ema`. Gamma depends on where the
//! candidate's mid sits relative to the previous filtered mid: quotes that
//! drifted down (or held) get the tight band, quotes that drifted up get
//! the wide one. Without a usable bid the narrow default applies.

use crate::data::{Quote, PRICE_EPS};

use super::{GAMMA_0, GAMMA_1, GAMMA_2};

/// Pick gamma for one candidate quote.
///
/// `fresh` marks the first snapshot after a state reset; with no previous
/// filtered mid to compare against, a quoted bid then gets the wide band
/// instead of the narrow default.
pub fn select(q: Option<&Quote>, prev_mid: Option<f64>, fresh: bool) -> f64 {
    let Some(q) = q else { return GAMMA_0 };
    if q.bid <= 0.0 {
        return GAMMA_0;
    }
    match prev_mid {
        None if fresh => GAMMA_2,
        None => GAMMA_0,
        Some(m_hat) => {
            if q.mid() <= m_hat + PRICE_EPS {
                GAMMA_1
            } else {
                GAMMA_2
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_quote_gets_default() {
        assert_eq!(select(None, Some(10.0), false), GAMMA_0);
        assert_eq!(select(None, None, true), GAMMA_0);
    }

    #[test]
    fn zero_bid_gets_default_even_when_fresh() {
        let q = Quote::new(0.0, 5.0);
        assert_eq!(select(Some(&q), None, true), GAMMA_0);
        assert_eq!(select(Some(&q), Some(10.0), false), GAMMA_0);
    }

    #[test]
    fn missing_prev_mid_defaults_narrow_mid_session() {
        let q = Quote::new(5.0, 6.0);
        assert_eq!(select(Some(&q), None, false), GAMMA_0);
    }

    #[test]
    fn missing_prev_mid_widens_on_fresh_snapshot() {
        let q = Quote::new(5.0, 6.0);
        assert_eq!(select(Some(&q), None, true), GAMMA_2);
    }

    #[test]
    fn mid_at_or_below_prev_gets_middle_band() {
        let q = Quote::new(9.0, 11.0); // mid 10
        assert_eq!(select(Some(&q), Some(10.0), false), GAMMA_1);
        assert_eq!(select(Some(&q), Some(12.0), false), GAMMA_1);
    }

    #[test]
    fn mid_above_prev_gets_wide_band() {
        let q = Quote::new(11.0, 13.0); // mid 12
        assert_eq!(select(Some(&q), Some(10.0), false), GAMMA_2);
    }

    #[test]
    fn mid_comparison_uses_tolerance() {
        // A mid a hair above the previous one still counts as equal.
        let q = Quote::new(9.0, 11.0 + 1e-10);
        assert_eq!(select(Some(&q), Some(10.0), false), GAMMA_1);
    }
}

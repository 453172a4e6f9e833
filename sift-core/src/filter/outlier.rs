//! Outlier classification.
//!
//! A candidate survives if any acceptance condition holds:
//!
//! - C1: spread within `gamma * ema`
//! - C2: spread at or under the absolute ceiling
//! - C3: bid above the previous filtered mid
//! - C4: ask below the previous filtered mid, with a quoted bid
//!
//! Two short-circuits precede the conditions and are mutually exclusive:
//! a missing EMA (tag `6`) and a missing previous filtered mid (tag `5`)
//! both mean there is no band to compare against, so the candidate passes
//! outright. An absent candidate is classified as neither.
//!
//! The result is a small bitset; it turns into the report tag string only
//! at the output boundary.

use crate::data::QuoteAt;

use super::LAMBDA;

const C1: u8 = 1 << 0;
const C2: u8 = 1 << 1;
const C3: u8 = 1 << 2;
const C4: u8 = 1 << 3;
const E5: u8 = 1 << 4;
const E6: u8 = 1 << 5;
const OUTLIER: u8 = 1 << 6;
const ABSENT: u8 = 1 << 7;

/// Classification result for one candidate quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlierClass(u8);

impl Default for OutlierClass {
    fn default() -> Self {
        Self::absent()
    }
}

impl OutlierClass {
    /// No candidate to classify.
    #[inline]
    pub const fn absent() -> Self {
        Self(ABSENT)
    }

    /// No acceptance condition held.
    #[inline]
    pub const fn outlier() -> Self {
        Self(OUTLIER)
    }

    #[inline]
    const fn e5() -> Self {
        Self(E5)
    }

    #[inline]
    const fn e6() -> Self {
        Self(E6)
    }

    #[inline]
    pub fn is_absent(self) -> bool {
        self.0 & ABSENT != 0
    }

    #[inline]
    pub fn is_outlier(self) -> bool {
        self.0 & OUTLIER != 0
    }

    /// Classified and accepted (conditions or a short-circuit).
    #[inline]
    pub fn is_non_outlier(self) -> bool {
        !self.is_absent() && !self.is_outlier()
    }

    /// Whether acceptance condition `n` (1..=6) matched.
    pub fn matched(self, n: u8) -> bool {
        let bit = match n {
            1 => C1,
            2 => C2,
            3 => C3,
            4 => C4,
            5 => E5,
            6 => E6,
            _ => return false,
        };
        self.0 & bit != 0
    }

    /// Report tag: `-` for no candidate, `V` for an outlier, otherwise the
    /// matched condition numbers in ascending order.
    pub fn label(self) -> String {
        if self.is_absent() {
            return "-".to_string();
        }
        if self.is_outlier() {
            return "V".to_string();
        }
        let matched: Vec<String> =
            (1u8..=6).filter(|&n| self.matched(n)).map(|n| n.to_string()).collect();
        matched.join(",")
    }
}

/// Classify one candidate.
///
/// `ema` and `prev_mid` are the values carried into the snapshot (after any
/// market-open reset), not the freshly blended ones.
pub fn classify(
    q: Option<&QuoteAt>,
    gamma: f64,
    ema: Option<f64>,
    prev_mid: Option<f64>,
) -> OutlierClass {
    let Some(q) = q else {
        return OutlierClass::absent();
    };
    let Some(ema) = ema else {
        return OutlierClass::e6();
    };
    let Some(m_hat) = prev_mid else {
        return OutlierClass::e5();
    };

    let spread = q.spread();
    let mut bits = 0u8;
    if spread <= gamma * ema {
        bits |= C1;
    }
    if spread <= LAMBDA {
        bits |= C2;
    }
    if q.quote.bid > m_hat {
        bits |= C3;
    }
    if q.quote.ask < m_hat && q.quote.bid > 0.0 {
        bits |= C4;
    }

    if bits == 0 {
        OutlierClass::outlier()
    } else {
        OutlierClass(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(bid: f64, ask: f64) -> QuoteAt {
        QuoteAt::new(bid, ask, 1)
    }

    #[test]
    fn absent_candidate() {
        let class = classify(None, 1.2, Some(1.0), Some(10.0));
        assert!(class.is_absent());
        assert_eq!(class.label(), "-");
    }

    #[test]
    fn missing_ema_short_circuits_first() {
        // Both the EMA and the previous mid are missing: tag 6 wins.
        let q = at(5.0, 6.0);
        let class = classify(Some(&q), 1.2, None, None);
        assert!(class.is_non_outlier());
        assert_eq!(class.label(), "6");

        // EMA missing alone.
        let class = classify(Some(&q), 1.2, None, Some(5.5));
        assert_eq!(class.label(), "6");
    }

    #[test]
    fn missing_prev_mid_short_circuits_second() {
        let q = at(5.0, 6.0);
        let class = classify(Some(&q), 1.2, Some(1.0), None);
        assert!(class.is_non_outlier());
        assert_eq!(class.label(), "5");
    }

    #[test]
    fn conditions_accumulate() {
        // spread 1 <= 1.5 * 1.0 (C1), <= 15 (C2); bid 9 above mid 8.5 (C3).
        let q = at(9.0, 10.0);
        let class = classify(Some(&q), 1.5, Some(1.0), Some(8.5));
        assert!(class.is_non_outlier());
        assert_eq!(class.label(), "1,2,3");
    }

    #[test]
    fn ceiling_alone_saves_wide_band() {
        // spread 10 fails C1 (band 2.0) but sits under the ceiling.
        let q = at(100.0, 110.0);
        let class = classify(Some(&q), 2.0, Some(1.0), Some(120.0));
        assert!(class.is_non_outlier());
        assert!(class.matched(2));
        assert!(!class.matched(1));
    }

    #[test]
    fn ask_below_prev_mid_needs_quoted_bid() {
        // Ask under the previous mid with a live bid: C4.
        let q = at(3.0, 4.0);
        let class = classify(Some(&q), 1.2, Some(0.01), Some(30.0));
        assert!(class.matched(4));

        // Same shape without a bid: C4 cannot fire, and nothing else does.
        let q = at(0.0, 4.0);
        let class = classify(Some(&q), 1.2, Some(0.01), Some(30.0));
        assert_eq!(class.label(), "V");
    }

    #[test]
    fn outlier_when_nothing_matches() {
        // spread 49, band 2.0, ceiling 15, bid under mid, ask over mid.
        let q = at(1.0, 50.0);
        let class = classify(Some(&q), 2.0, Some(1.0), Some(11.0));
        assert!(class.is_outlier());
        assert_eq!(class.label(), "V");
    }

    #[test]
    fn one_sided_quote_is_outlier_once_a_band_exists() {
        // Sentinel spread fails C1/C2, and a zero bid rules out C3/C4.
        let q = at(0.0, 6.0);
        let class = classify(Some(&q), 1.2, Some(1.0), Some(5.0));
        assert_eq!(class.label(), "V");
    }

    #[test]
    fn default_is_absent() {
        assert_eq!(OutlierClass::default().label(), "-");
    }
}

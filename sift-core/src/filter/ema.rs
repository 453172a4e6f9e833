//! Spread EMA recurrence.
//!
//! The estimator smooths the per-snapshot min-spread with a heavy weight on
//! history. Both the previous value and the current observation are
//! optional; the four cases reduce to "seed, hold, or blend".

use super::ALPHA;

/// One EMA update.
///
/// - no history, no observation: still absent
/// - no history: seed directly from the observation
/// - no observation: hold the previous value
/// - otherwise: `alpha * prev + (1 - alpha) * s`
pub fn update(ema_prev: Option<f64>, s_k: Option<f64>) -> Option<f64> {
    match (ema_prev, s_k) {
        (None, None) => None,
        (None, Some(s)) => Some(s),
        (Some(prev), None) => Some(prev),
        (Some(prev), Some(s)) => Some(ALPHA * prev + (1.0 - ALPHA) * s),
    }
}

//! Product-symbol decoding.
//!
//! Listed option ids follow `PP T AAAAA CC` over ten characters: a
//! two-letter product code, the class letter (`O` marks the standard
//! monthly contract), a five-digit strike, then a month letter and a year
//! digit. Month letters encode both side and expiry month: `A`-`L` are
//! calls for January through December, `M`-`X` the puts. The year digit is
//! the final digit of a 202x year.

use sift_core::data::{ProductKey, Side};

use crate::errors::LoadError;

/// The standard monthly contract this pipeline targets.
pub const TARGET_PRODUCT: &str = "TXO";

/// A decoded product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSymbol {
    pub key: ProductKey,
    /// Expiry month as `yyyymm`.
    pub expiry: u32,
}

/// Decode a raw product id, returning `None` for ids that are malformed or
/// not the target product (weeklies, adjusted contracts, other roots).
pub fn decode_symbol(raw: &str) -> Option<ParsedSymbol> {
    let id = raw.trim();
    if id.len() != 10 || !id.is_ascii() {
        return None;
    }
    if &id[0..3] != TARGET_PRODUCT {
        return None;
    }

    let strike: u32 = id[3..8].parse().ok()?;

    let mut tail = id[8..10].chars();
    let month_code = tail.next()?;
    let year_digit = tail.next()?.to_digit(10)?;

    let (side, month) = match month_code {
        'A'..='L' => (Side::Call, month_code as u32 - 'A' as u32 + 1),
        'M'..='X' => (Side::Put, month_code as u32 - 'M' as u32 + 1),
        _ => return None,
    };

    let year = 2020 + year_digit;
    Some(ParsedSymbol {
        key: ProductKey::new(strike, side),
        expiry: year * 100 + month,
    })
}

/// Infer the near and next expiry months from everything decoded that day.
///
/// The two smallest distinct months win; fewer than two distinct months
/// means the day cannot be split and loading fails.
pub fn near_next_terms(expiries: impl IntoIterator<Item = u32>) -> Result<(u32, u32), LoadError> {
    let mut months: Vec<u32> = expiries.into_iter().collect();
    months.sort_unstable();
    months.dedup();
    match months.as_slice() {
        [near, next, ..] => Ok((*near, *next)),
        _ => Err(LoadError::TooFewExpiries { found: months.len() }),
    }
}

//! Per-day tick store.
//!
//! Holds the full day of ticks in one globally seq-sorted array and assigns
//! every product a small dense id on first observation. Downstream state
//! lives in plain vectors indexed by [`ProductId`]; the hash map exists only
//! for id assignment, never on the hot path.
//!
//! Range queries (`ticks_up_to`, `product_slice`) are binary searches over
//! the sorted seq arrays, not materialized copies.

use std::collections::HashMap;

use crate::data::types::{ProductKey, Quote, Tick};
use crate::errors::ShapeError;

/// Dense product identifier, assigned in order of first observation.
///
/// Because assignment follows the global seq order, the products observed up
/// to any seq cap are exactly ids `0..n` for some `n`.
pub type ProductId = u32;

/// A tick after product-id compaction.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTick {
    pub seq: u64,
    pub product: ProductId,
    pub bid: f64,
    pub ask: f64,
    pub time_raw: String,
}

impl StoredTick {
    #[inline]
    pub fn quote(&self) -> Quote {
        Quote::new(self.bid, self.ask)
    }
}

/// Append-only, seq-ordered store for one day and one expiry term.
#[derive(Debug, Default)]
pub struct TickStore {
    ticks: Vec<StoredTick>,
    keys: Vec<ProductKey>,
    ids: HashMap<ProductKey, ProductId>,
    /// Per-product indices into `ticks`, ascending.
    rows: Vec<Vec<u32>>,
}

impl TickStore {
    /// Build a store from a day of ticks.
    ///
    /// The input must already be sorted by `seq`, strictly increasing; a
    /// violation is a fatal input-shape error and the pipeline refuses to
    /// start.
    pub fn from_ticks(ticks: Vec<Tick>) -> Result<Self, ShapeError> {
        let mut store = Self {
            ticks: Vec::with_capacity(ticks.len()),
            keys: Vec::new(),
            ids: HashMap::new(),
            rows: Vec::new(),
        };

        let mut prev_seq: Option<u64> = None;
        for (index, tick) in ticks.into_iter().enumerate() {
            if let Some(prev) = prev_seq {
                if tick.seq <= prev {
                    return Err(ShapeError::UnsortedTicks {
                        index,
                        prev_seq: prev,
                        seq: tick.seq,
                    });
                }
            }
            prev_seq = Some(tick.seq);

            let id = store.assign_id(tick.product);
            let row = store.ticks.len() as u32;
            store.rows[id as usize].push(row);
            store.ticks.push(StoredTick {
                seq: tick.seq,
                product: id,
                bid: tick.bid,
                ask: tick.ask,
                time_raw: tick.time_raw,
            });
        }

        Ok(store)
    }

    fn assign_id(&mut self, key: ProductKey) -> ProductId {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.keys.len() as ProductId;
        self.keys.push(key);
        self.ids.insert(key, id);
        self.rows.push(Vec::new());
        id
    }

    /// Number of ticks in the store.
    #[inline]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Number of distinct products observed over the day.
    #[inline]
    pub fn product_count(&self) -> usize {
        self.keys.len()
    }

    /// Key for a dense product id.
    #[inline]
    pub fn product_key(&self, id: ProductId) -> ProductKey {
        self.keys[id as usize]
    }

    /// Dense id for a key, if the product was observed.
    #[inline]
    pub fn product_id(&self, key: ProductKey) -> Option<ProductId> {
        self.ids.get(&key).copied()
    }

    /// All ticks, seq order.
    #[inline]
    pub fn ticks(&self) -> &[StoredTick] {
        &self.ticks
    }

    /// Slice of all ticks with `seq <= seq_cap`.
    pub fn ticks_up_to(&self, seq_cap: u64) -> &[StoredTick] {
        let end = self.ticks.partition_point(|t| t.seq <= seq_cap);
        &self.ticks[..end]
    }

    /// Ticks of one product with `lo_seq <= seq <= hi_seq`, seq order.
    pub fn product_slice(
        &self,
        key: ProductKey,
        lo_seq: u64,
        hi_seq: u64,
    ) -> impl Iterator<Item = &StoredTick> + '_ {
        let rows: &[u32] = match self.product_id(key) {
            Some(id) => &self.rows[id as usize],
            None => &[],
        };
        let start = rows.partition_point(|&r| self.ticks[r as usize].seq < lo_seq);
        let end = rows.partition_point(|&r| self.ticks[r as usize].seq <= hi_seq);
        rows[start..end].iter().map(move |&r| &self.ticks[r as usize])
    }
}

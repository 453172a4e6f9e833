//! Snapshot-row assembly.
//!
//! The filter emits one outcome per product (strike and side); the report
//! wants one row per strike with both sides present. The assembler merges
//! sides and keeps missing values as explicit optional slots; the numeric
//! fills (zeroes, the default gamma, `-` tags) are applied by the accessor
//! methods the report writer uses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::{ProductKey, Quote, QuoteAt, Side};
use crate::filter::{FilterOutcome, OutlierClass, SourceTag, GAMMA_0};
use crate::replay::ProductRecord;

/// One side (call or put) of an assembled row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideOutput {
    pub q_hat: Option<Quote>,
    pub source: Option<SourceTag>,
    pub last: Option<QuoteAt>,
    pub last_class: OutlierClass,
    pub min: Option<QuoteAt>,
    pub min_class: OutlierClass,
    pub ema: Option<f64>,
    pub gamma: Option<f64>,
}

impl SideOutput {
    /// Combine a reconstruction record and a filter outcome.
    pub fn from_parts(record: &ProductRecord, outcome: &FilterOutcome) -> Self {
        Self {
            q_hat: outcome.q_hat,
            source: Some(outcome.source),
            last: record.last_valid,
            last_class: outcome.last_class,
            min: record.min,
            min_class: outcome.min_class,
            ema: outcome.ema,
            gamma: Some(outcome.gamma),
        }
    }

    #[inline]
    pub fn bid(&self) -> f64 {
        self.q_hat.map_or(0.0, |q| q.bid)
    }

    #[inline]
    pub fn ask(&self) -> f64 {
        self.q_hat.map_or(0.0, |q| q.ask)
    }

    pub fn source_label(&self) -> &'static str {
        self.source.map_or("-", SourceTag::as_str)
    }

    #[inline]
    pub fn last_bid(&self) -> f64 {
        self.last.map_or(0.0, |q| q.quote.bid)
    }

    #[inline]
    pub fn last_ask(&self) -> f64 {
        self.last.map_or(0.0, |q| q.quote.ask)
    }

    #[inline]
    pub fn last_seq(&self) -> u64 {
        self.last.map_or(0, |q| q.seq)
    }

    pub fn last_tag(&self) -> String {
        self.last_class.label()
    }

    #[inline]
    pub fn min_bid(&self) -> f64 {
        self.min.map_or(0.0, |q| q.quote.bid)
    }

    #[inline]
    pub fn min_ask(&self) -> f64 {
        self.min.map_or(0.0, |q| q.quote.ask)
    }

    #[inline]
    pub fn min_seq(&self) -> u64 {
        self.min.map_or(0, |q| q.seq)
    }

    /// Min-pick spread, zero-filled; the sentinel spread also fills as zero.
    pub fn min_spread(&self) -> f64 {
        match self.min.map(|q| q.spread()) {
            Some(s) if s.is_finite() => s,
            _ => 0.0,
        }
    }

    pub fn min_tag(&self) -> String {
        self.min_class.label()
    }

    #[inline]
    pub fn ema_filled(&self) -> f64 {
        self.ema.unwrap_or(0.0)
    }

    #[inline]
    pub fn gamma_filled(&self) -> f64 {
        self.gamma.unwrap_or(GAMMA_0)
    }
}

/// One assembled row: one snapshot time, one strike, both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub time_key: String,
    pub strike: u32,
    /// The snapshot's seq cap, reported as `snapshot_sysID`.
    pub seq_cap: u64,
    pub call: SideOutput,
    pub put: SideOutput,
}

impl SnapshotRow {
    #[inline]
    pub fn side(&self, side: Side) -> &SideOutput {
        match side {
            Side::Call => &self.call,
            Side::Put => &self.put,
        }
    }
}

/// Serializable flat view of a row, matching the report column set.
#[derive(Debug, Serialize)]
pub struct FlatRow<'a> {
    pub time: &'a str,
    pub strike: u32,
    #[serde(rename = "c.bid")]
    pub c_bid: f64,
    #[serde(rename = "c.ask")]
    pub c_ask: f64,
    #[serde(rename = "p.bid")]
    pub p_bid: f64,
    #[serde(rename = "p.ask")]
    pub p_ask: f64,
    #[serde(rename = "c.source")]
    pub c_source: &'a str,
    #[serde(rename = "p.source")]
    pub p_source: &'a str,
    #[serde(rename = "c.last_bid")]
    pub c_last_bid: f64,
    #[serde(rename = "c.last_ask")]
    pub c_last_ask: f64,
    #[serde(rename = "c.last_sysID")]
    pub c_last_sys_id: u64,
    #[serde(rename = "c.last_outlier")]
    pub c_last_outlier: String,
    #[serde(rename = "p.last_bid")]
    pub p_last_bid: f64,
    #[serde(rename = "p.last_ask")]
    pub p_last_ask: f64,
    #[serde(rename = "p.last_sysID")]
    pub p_last_sys_id: u64,
    #[serde(rename = "p.last_outlier")]
    pub p_last_outlier: String,
    #[serde(rename = "c.min_bid")]
    pub c_min_bid: f64,
    #[serde(rename = "c.min_ask")]
    pub c_min_ask: f64,
    #[serde(rename = "c.min_sysID")]
    pub c_min_sys_id: u64,
    #[serde(rename = "c.min_outlier")]
    pub c_min_outlier: String,
    #[serde(rename = "p.min_bid")]
    pub p_min_bid: f64,
    #[serde(rename = "p.min_ask")]
    pub p_min_ask: f64,
    #[serde(rename = "p.min_sysID")]
    pub p_min_sys_id: u64,
    #[serde(rename = "p.min_outlier")]
    pub p_min_outlier: String,
    #[serde(rename = "c.ema")]
    pub c_ema: f64,
    #[serde(rename = "p.ema")]
    pub p_ema: f64,
    #[serde(rename = "c.gamma")]
    pub c_gamma: f64,
    #[serde(rename = "p.gamma")]
    pub p_gamma: f64,
    #[serde(rename = "snapshot_sysID")]
    pub snapshot_sys_id: u64,
}

impl SnapshotRow {
    /// Flatten with the output fills applied.
    pub fn flatten(&self) -> FlatRow<'_> {
        let (c, p) = (&self.call, &self.put);
        FlatRow {
            time: &self.time_key,
            strike: self.strike,
            c_bid: c.bid(),
            c_ask: c.ask(),
            p_bid: p.bid(),
            p_ask: p.ask(),
            c_source: c.source_label(),
            p_source: p.source_label(),
            c_last_bid: c.last_bid(),
            c_last_ask: c.last_ask(),
            c_last_sys_id: c.last_seq(),
            c_last_outlier: c.last_tag(),
            p_last_bid: p.last_bid(),
            p_last_ask: p.last_ask(),
            p_last_sys_id: p.last_seq(),
            p_last_outlier: p.last_tag(),
            c_min_bid: c.min_bid(),
            c_min_ask: c.min_ask(),
            c_min_sys_id: c.min_seq(),
            c_min_outlier: c.min_tag(),
            p_min_bid: p.min_bid(),
            p_min_ask: p.min_ask(),
            p_min_sys_id: p.min_seq(),
            p_min_outlier: p.min_tag(),
            c_ema: c.ema_filled(),
            p_ema: p.ema_filled(),
            c_gamma: c.gamma_filled(),
            p_gamma: p.gamma_filled(),
            snapshot_sys_id: self.seq_cap,
        }
    }
}

/// Merge per-side outputs into rows, one per strike, strike ascending.
pub fn assemble(
    time_key: &str,
    seq_cap: u64,
    sides: impl IntoIterator<Item = (ProductKey, SideOutput)>,
) -> Vec<SnapshotRow> {
    let mut by_strike: BTreeMap<u32, (Option<SideOutput>, Option<SideOutput>)> = BTreeMap::new();
    for (key, side) in sides {
        let entry = by_strike.entry(key.strike).or_default();
        match key.side {
            Side::Call => entry.0 = Some(side),
            Side::Put => entry.1 = Some(side),
        }
    }

    by_strike
        .into_iter()
        .map(|(strike, (call, put))| SnapshotRow {
            time_key: time_key.to_string(),
            strike,
            seq_cap,
            call: call.unwrap_or_default(),
            put: put.unwrap_or_default(),
        })
        .collect()
}

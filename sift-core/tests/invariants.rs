//! Universal pipeline invariants, checked over randomized days.
//!
//! The generators mix valid, one-sided, crossed, and empty quotes across a
//! few products, and schedules that may cross the market-open reset. Every
//! invariant is re-derived from the emitted rows plus raw store queries,
//! not from pipeline internals.

use proptest::prelude::*;
use sift_core::data::{ProductKey, Side, Tick, TickStore};
use sift_core::pipeline::DayRun;
use sift_core::schedule::{Schedule, OPEN_RESET_TIME};
use sift_core::{SideOutput, SnapshotRow};

const KEYS: [ProductKey; 4] = [
    ProductKey { strike: 28000, side: Side::Call },
    ProductKey { strike: 28000, side: Side::Put },
    ProductKey { strike: 28200, side: Side::Call },
    ProductKey { strike: 28400, side: Side::Put },
];

const BIDS: [f64; 8] = [0.0, 0.0, 1.0, 2.0, 5.0, 9.0, 10.0, 30.0];
const ASKS: [f64; 8] = [0.0, 1.5, 2.5, 6.0, 9.5, 10.5, 26.0, 80.0];

fn arb_ticks() -> impl Strategy<Value = Vec<Tick>> {
    proptest::collection::vec((1u64..8, 0usize..KEYS.len(), 0usize..8, 0usize..8), 1..120)
        .prop_map(|raw| {
            let mut seq = 0u64;
            raw.into_iter()
                .map(|(gap, k, b, a)| {
                    seq += gap;
                    Tick::new(seq, KEYS[k], BIDS[b], ASKS[a], "084500000000")
                })
                .collect()
        })
}

fn arb_schedule() -> impl Strategy<Value = Schedule> {
    (
        proptest::collection::vec(1u64..200, 1..8),
        proptest::option::of(0usize..8),
    )
        .prop_map(|(gaps, reset_at)| {
            let mut cap = 0u64;
            let points: Vec<(String, u64)> = gaps
                .iter()
                .enumerate()
                .map(|(i, gap)| {
                    cap += gap;
                    let time = if reset_at == Some(i) {
                        OPEN_RESET_TIME.to_string()
                    } else {
                        format!("0845{:02}", i)
                    };
                    (time, cap)
                })
                .collect();
            Schedule::new(0, points).unwrap()
        })
}

/// Chronological per-side view over the emitted rows, paired with the
/// snapshot spec each entry was emitted at.
fn side_timeline<'a>(
    rows: &'a [SnapshotRow],
    schedule: &'a Schedule,
    key: ProductKey,
) -> Vec<(&'a sift_core::SnapshotSpec, &'a SideOutput)> {
    schedule
        .iter()
        .filter_map(|spec| {
            rows.iter()
                .find(|r| r.time_key == spec.time_key && r.strike == key.strike)
                .map(|r| (spec, r.side(key.side)))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gamma_is_always_in_the_fixed_set(
        ticks in arb_ticks(),
        schedule in arb_schedule(),
    ) {
        let store = TickStore::from_ticks(ticks).unwrap();
        let (rows, _) = DayRun::new(&store, &schedule).run();
        for row in &rows {
            for side in [&row.call, &row.put] {
                let g = side.gamma_filled();
                prop_assert!(
                    g == 1.2 || g == 1.5 || g == 2.0,
                    "gamma {} outside the fixed set", g
                );
            }
        }
    }

    #[test]
    fn latest_valid_seq_is_nondecreasing_and_sticky(
        ticks in arb_ticks(),
        schedule in arb_schedule(),
    ) {
        let store = TickStore::from_ticks(ticks).unwrap();
        let (rows, _) = DayRun::new(&store, &schedule).run();

        for key in KEYS {
            let mut prev_seq = 0u64;
            for (_, side) in side_timeline(&rows, &schedule, key) {
                let seq = side.last_seq();
                prop_assert!(
                    seq >= prev_seq,
                    "latest-valid seq regressed: {} then {}", prev_seq, seq
                );
                prev_seq = seq;
            }
        }
    }

    #[test]
    fn min_pick_lies_in_the_interval_or_is_the_prior_valid(
        ticks in arb_ticks(),
        schedule in arb_schedule(),
    ) {
        let store = TickStore::from_ticks(ticks).unwrap();
        let (rows, _) = DayRun::new(&store, &schedule).run();

        for key in KEYS {
            for (spec, side) in side_timeline(&rows, &schedule, key) {
                if side.min_tag() == "-" {
                    continue;
                }
                let min_seq = side.min_seq();
                let b = store
                    .product_slice(key, 0, spec.seq_cap)
                    .last()
                    .map(|t| t.seq)
                    .unwrap_or(0);
                let a = store
                    .product_slice(key, 0, spec.prev_seq_cap)
                    .last()
                    .map(|t| t.seq)
                    .unwrap_or(0);
                let in_interval = min_seq >= a && min_seq <= b;
                let is_prior_valid = min_seq == side.last_seq();
                prop_assert!(
                    in_interval || is_prior_valid,
                    "min pick seq {} outside [{}, {}] for {:?}", min_seq, a, b, key
                );
            }
        }
    }

    #[test]
    fn ema_follows_the_recurrence(
        ticks in arb_ticks(),
        schedule in arb_schedule(),
    ) {
        let store = TickStore::from_ticks(ticks).unwrap();
        let (rows, _) = DayRun::new(&store, &schedule).run();

        for key in KEYS {
            let timeline = side_timeline(&rows, &schedule, key);
            for pair in timeline.windows(2) {
                let (_, prev) = pair[0];
                let (spec, cur) = pair[1];
                if spec.is_open_reset() {
                    continue;
                }
                let prev_ema = prev.ema_filled();
                let s_k = cur.min_spread();
                if prev_ema > 0.0 && s_k > 0.0 {
                    let expected = 0.95 * prev_ema + 0.05 * s_k;
                    prop_assert!(
                        (cur.ema_filled() - expected).abs() < 1e-12,
                        "ema {} != {}", cur.ema_filled(), expected
                    );
                }
            }
        }
    }

    #[test]
    fn double_outlier_replays_the_previous_filtered_quote(
        ticks in arb_ticks(),
        schedule in arb_schedule(),
    ) {
        let store = TickStore::from_ticks(ticks).unwrap();
        let (rows, _) = DayRun::new(&store, &schedule).run();

        for key in KEYS {
            let timeline = side_timeline(&rows, &schedule, key);
            for pair in timeline.windows(2) {
                let (_, prev) = pair[0];
                let (_, cur) = pair[1];
                if cur.last_tag() == "V" && cur.min_tag() == "V" && prev.ask() > 0.0 {
                    prop_assert_eq!(cur.source_label(), "Replacement");
                    prop_assert_eq!(cur.bid(), prev.bid());
                    prop_assert_eq!(cur.ask(), prev.ask());
                }
            }
        }
    }

    #[test]
    fn non_outlier_tags_are_coherent(
        ticks in arb_ticks(),
        schedule in arb_schedule(),
    ) {
        let store = TickStore::from_ticks(ticks).unwrap();
        let (rows, _) = DayRun::new(&store, &schedule).run();

        let spread_of = |bid: f64, ask: f64| -> f64 {
            if bid > 0.0 && ask > 0.0 && ask > bid { ask - bid } else { f64::INFINITY }
        };

        for key in KEYS {
            let timeline = side_timeline(&rows, &schedule, key);
            for pair in timeline.windows(2) {
                let (_, prev) = pair[0];
                let (spec, cur) = pair[1];
                if spec.is_open_reset() || prev.ask() <= 0.0 || prev.ema_filled() <= 0.0 {
                    continue;
                }
                let m_hat = (prev.bid() + prev.ask()) / 2.0;
                let ema = prev.ema_filled();

                for (tag, bid, ask) in [
                    (cur.last_tag(), cur.last_bid(), cur.last_ask()),
                    (cur.min_tag(), cur.min_bid(), cur.min_ask()),
                ] {
                    if tag == "-" || tag == "5" || tag == "6" {
                        continue;
                    }
                    let s = spread_of(bid, ask);
                    let gamma = if bid <= 0.0 {
                        1.2
                    } else if (bid + ask) / 2.0 <= m_hat + 1e-9 {
                        1.5
                    } else {
                        2.0
                    };
                    let c1 = s <= gamma * ema;
                    let c2 = s <= 15.0;
                    let c3 = bid > m_hat;
                    let c4 = ask < m_hat && bid > 0.0;

                    if tag == "V" {
                        prop_assert!(
                            !c1 && !c2 && !c3 && !c4,
                            "outlier tag but a condition holds for ({}, {})", bid, ask
                        );
                    } else {
                        for digit in tag.split(',') {
                            let holds = match digit {
                                "1" => c1,
                                "2" => c2,
                                "3" => c3,
                                "4" => c4,
                                other => {
                                    prop_assert!(false, "unexpected tag digit {}", other);
                                    false
                                }
                            };
                            prop_assert!(
                                holds,
                                "tag digit {} does not hold for ({}, {})", digit, bid, ask
                            );
                        }
                    }
                }
            }
        }
    }
}

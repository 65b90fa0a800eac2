//! Property tests for the winnings and collector invariants.
//!
//! Uses proptest to verify:
//! 1. Payout schedule: `50 - 5 * (r - 1)` inside the top ten, 0 elsewhere
//! 2. Cumulative winnings: non-decreasing, equal to the running payout sum
//! 3. Breaker trip point: trips on exactly the threshold-th failure in a row

use chrono::NaiveDate;
use contestlab_core::data::CircuitBreaker;
use contestlab_core::winnings::{cumulative_winnings, payout, quant_ranking};
use contestlab_core::ResultTable;
use proptest::prelude::*;
use std::path::Path;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Per-quant rank history: `None` means the quant skipped that day.
fn arb_season() -> impl Strategy<Value = Vec<Vec<Option<u32>>>> {
    (1usize..6, 1usize..15).prop_flat_map(|(quants, days)| {
        prop::collection::vec(
            prop::collection::vec(prop::option::of(1u32..25), days),
            quants,
        )
    })
}

fn season_table(season: &[Vec<Option<u32>>]) -> ResultTable {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let mut csv = String::from("name,rank,date\n");
    for (q, ranks) in season.iter().enumerate() {
        for (day, rank) in ranks.iter().enumerate() {
            if let Some(rank) = rank {
                let date = start + chrono::Duration::days(day as i64);
                csv.push_str(&format!("q{q},{rank},{date}\n"));
            }
        }
    }
    ResultTable::from_csv_reader(csv.as_bytes(), Path::new("season.csv"), None).unwrap()
}

// ── 1. Payout schedule ───────────────────────────────────────────────

proptest! {
    #[test]
    fn payout_matches_formula(rank in 0u32..1000) {
        let expected = if (1..=10).contains(&rank) { 50 - 5 * (rank - 1) } else { 0 };
        prop_assert_eq!(payout(rank), expected);
    }
}

// ── 2. Cumulative winnings ───────────────────────────────────────────

proptest! {
    /// Once defined, a quant's running total never decreases and always equals
    /// the sum of their payouts up to and including that day.
    #[test]
    fn cumulative_is_running_payout_sum(season in arb_season()) {
        let table = season_table(&season);
        prop_assume!(!table.is_empty());
        let cumulative = cumulative_winnings(&table).unwrap();

        for name in cumulative.names() {
            let series = cumulative.series(name).unwrap();
            let mut running = 0u64;
            let mut previous: Option<u64> = None;

            for (date, value) in cumulative.dates().iter().zip(series) {
                let paid = table
                    .get(name, *date)
                    .and_then(|r| table.cell(r, "rank"))
                    .and_then(|c| c.as_rank())
                    .map_or(0, payout);
                running += u64::from(paid);

                if running == 0 {
                    prop_assert_eq!(*value, None);
                } else {
                    prop_assert_eq!(*value, Some(running));
                }
                if let (Some(prev), Some(cur)) = (previous, *value) {
                    prop_assert!(cur >= prev);
                }
                if value.is_some() {
                    previous = *value;
                }
            }
        }
    }

    /// The last running total of every paid quant is their season total.
    #[test]
    fn last_cumulative_equals_ranking_total(season in arb_season()) {
        let table = season_table(&season);
        prop_assume!(!table.is_empty());
        let cumulative = cumulative_winnings(&table).unwrap();
        let ranking = quant_ranking(&table).unwrap();
        let last = *cumulative.dates().last().unwrap();

        for entry in ranking.entries() {
            let expected = (entry.total > 0).then_some(entry.total);
            prop_assert_eq!(cumulative.get(&entry.name, last), expected);
        }
    }

    /// The ranking is sorted by total, highest first.
    #[test]
    fn ranking_is_descending(season in arb_season()) {
        let table = season_table(&season);
        prop_assume!(!table.is_empty());
        let ranking = quant_ranking(&table).unwrap();
        for pair in ranking.entries().windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }
    }
}

// ── 3. Breaker trip point ────────────────────────────────────────────

proptest! {
    #[test]
    fn breaker_trips_on_threshold_th_consecutive_failure(
        threshold in 1u32..30,
        outcomes in prop::collection::vec(any::<bool>(), 0..80),
    ) {
        let mut breaker = CircuitBreaker::new(threshold);
        let mut streak = 0u32;

        for ok in outcomes {
            prop_assert!(breaker.is_allowed());
            if ok {
                breaker.record_success();
                streak = 0;
            } else {
                breaker.record_failure();
                streak += 1;
            }
            prop_assert_eq!(breaker.is_allowed(), streak < threshold);
            if !breaker.is_allowed() {
                break;
            }
        }
    }
}

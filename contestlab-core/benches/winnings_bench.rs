//! Criterion benchmarks for the winnings transform.
//!
//! Benchmarks:
//! 1. Quant ranking (payout + group sum + sort)
//! 2. Cumulative winnings (pivot, cumulative sum, forward fill)
//! 3. Full view (ranking + cumulative + outer merge into the table)

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::Path;

use contestlab_core::data::business_days;
use contestlab_core::winnings::{cumulative_winnings, quant_ranking};
use contestlab_core::{build_view, ResultTable};

// ── Helpers ──────────────────────────────────────────────────────────

/// A season where each quant skips roughly every seventh day and ranks
/// rotate so everyone eventually lands in the paid positions.
fn make_season(quants: usize, days: usize) -> ResultTable {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let end = start + chrono::Duration::days(days as i64 * 2);
    let dates: Vec<NaiveDate> = business_days(start, end).into_iter().take(days).collect();

    let mut csv = String::from("name,rank,score,date\n");
    for (day, date) in dates.iter().enumerate() {
        for q in 0..quants {
            if (q + day) % 7 == 6 {
                continue;
            }
            let rank = (q + day * 3) % quants + 1;
            let score = 1.0 - rank as f64 / quants as f64;
            csv.push_str(&format!("quant_{q},{rank},{score:.4},{date}\n"));
        }
    }
    ResultTable::from_csv_reader(csv.as_bytes(), Path::new("bench.csv"), None).unwrap()
}

// ── 1. Quant ranking ─────────────────────────────────────────────────

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("quant_ranking");
    for quants in [50usize, 500] {
        let table = make_season(quants, 218);
        group.bench_with_input(BenchmarkId::from_parameter(quants), &table, |b, table| {
            b.iter(|| quant_ranking(black_box(table)).unwrap())
        });
    }
    group.finish();
}

// ── 2. Cumulative winnings ───────────────────────────────────────────

fn bench_cumulative(c: &mut Criterion) {
    let mut group = c.benchmark_group("cumulative_winnings");
    for quants in [50usize, 500] {
        let table = make_season(quants, 218);
        group.bench_with_input(BenchmarkId::from_parameter(quants), &table, |b, table| {
            b.iter(|| cumulative_winnings(black_box(table)).unwrap())
        });
    }
    group.finish();
}

// ── 3. Full view ─────────────────────────────────────────────────────

fn bench_build_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_view");
    group.sample_size(20);
    let table = make_season(200, 218);
    group.bench_function("200_quants_218_days", |b| {
        b.iter(|| build_view(black_box(&table)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_ranking, bench_cumulative, bench_build_view);
criterion_main!(benches);

//! Contest winnings derived from daily ranks.
//!
//! The top ten of each contest day are paid on a fixed schedule (50 for
//! first place down to 5 for tenth); everyone else gets nothing. From that
//! the module derives:
//! - per-quant totals over the whole season (`QuantRanking`)
//! - per-quant running totals by day (`CumulativeWinnings`), built as
//!   pivot → cumulative sum → forward fill → unpivot
//! - the results table with a `cumulative_winnings` column merged in

use crate::data::DataError;
use crate::table::{group_sum, Cell, Pivot, ResultTable, RANK_COLUMN};
use chrono::NaiveDate;
use serde::Serialize;

/// Payout for ranks 1 through 10.
pub const PAYOUT_SCHEDULE: [u32; 10] = [50, 45, 40, 35, 30, 25, 20, 15, 10, 5];

/// Column added by [`merge_cumulative`].
pub const CUMULATIVE_COLUMN: &str = "cumulative_winnings";

/// Payout for a daily rank: `50 - 5 * (rank - 1)` inside the top ten, else 0.
pub fn payout(rank: u32) -> u32 {
    match rank {
        1..=10 => PAYOUT_SCHEDULE[(rank - 1) as usize],
        _ => 0,
    }
}

/// Payout for a rank cell; null or non-integer ranks count as unranked.
pub fn payout_for_cell(cell: Option<&Cell>) -> u32 {
    cell.and_then(Cell::as_rank).map_or(0, payout)
}

/// One contestant's payout on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWinning {
    pub name: String,
    pub date: NaiveDate,
    pub payout: u32,
}

/// Payout of every record, in table order.
pub fn daily_winnings(table: &ResultTable) -> Result<Vec<DailyWinning>, DataError> {
    let rank_idx = table.require_column(RANK_COLUMN)?;
    Ok(table
        .records()
        .iter()
        .map(|r| DailyWinning {
            name: r.name().to_string(),
            date: r.date(),
            payout: payout_for_cell(r.cells().get(rank_idx)),
        })
        .collect())
}

/// A quant's total winnings for the season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub name: String,
    pub total: u64,
}

/// Quants ordered by total winnings, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct QuantRanking {
    entries: Vec<RankingEntry>,
}

impl QuantRanking {
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.total)
    }

    /// Names of the first `n` quants.
    pub fn top(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).map(|e| e.name.clone()).collect()
    }
}

/// Total winnings per quant, descending. Equal totals keep the order in
/// which the quants first appear in `table`.
pub fn quant_ranking(table: &ResultTable) -> Result<QuantRanking, DataError> {
    let totals = group_sum(
        daily_winnings(table)?
            .into_iter()
            .map(|w| (w.name, u64::from(w.payout))),
    );

    let mut entries: Vec<RankingEntry> = totals
        .into_iter()
        .map(|(name, total)| RankingEntry { name, total })
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total));

    Ok(QuantRanking { entries })
}

/// Running winnings per quant and day.
///
/// A quant's value is `None` until their first paid day; after that it is
/// the sum of all payouts so far and carries forward across days without a
/// payout or without a result at all.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeWinnings {
    pivot: Pivot<u64>,
}

impl CumulativeWinnings {
    pub fn names(&self) -> &[String] {
        self.pivot.names()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        self.pivot.dates()
    }

    pub fn get(&self, name: &str, date: NaiveDate) -> Option<u64> {
        self.pivot.get(name, date)
    }

    /// Values for one quant aligned with `dates()`.
    pub fn series(&self, name: &str) -> Option<&[Option<u64>]> {
        self.pivot.row(name)
    }

    /// Long form, dropping days before a quant's first payout.
    pub fn entries(&self) -> Vec<(String, NaiveDate, u64)> {
        self.pivot.unpivot()
    }
}

pub fn cumulative_winnings(table: &ResultTable) -> Result<CumulativeWinnings, DataError> {
    // Zero payouts are "no data" in the pivot, not a zero to sum.
    let entries = daily_winnings(table)?.into_iter().map(|w| {
        let value = (w.payout > 0).then_some(u64::from(w.payout));
        (w.name, w.date, value)
    });

    let pivot = Pivot::from_entries(entries).cumsum_rows().forward_fill_rows();
    Ok(CumulativeWinnings { pivot })
}

/// Outer-join the running winnings onto `table` by (name, date).
///
/// Existing rows get their cumulative value (or null); (name, date) pairs
/// only present in `cumulative` become new rows whose other cells are null.
/// The result is sorted by date, then name.
pub fn merge_cumulative(
    table: &ResultTable,
    cumulative: &CumulativeWinnings,
) -> Result<ResultTable, DataError> {
    let mut columns = table.columns().to_vec();
    let cum_idx = match table.column_index(CUMULATIVE_COLUMN) {
        Some(i) => i,
        None => {
            columns.push(CUMULATIVE_COLUMN.to_string());
            columns.len() - 1
        }
    };
    let width = columns.len();

    let mut merged = ResultTable::new(columns)?;
    for record in table.records() {
        let mut cells = record.cells().to_vec();
        cells.resize(width, Cell::Null);
        cells[cum_idx] = cumulative
            .get(record.name(), record.date())
            .map_or(Cell::Null, |v| Cell::Int(v as i64));
        merged.push(record.name().to_string(), record.date(), cells)?;
    }

    for (name, date, value) in cumulative.entries() {
        if table.get(&name, date).is_some() {
            continue;
        }
        let mut cells = vec![Cell::Null; width];
        cells[cum_idx] = Cell::Int(value as i64);
        merged.push(name, date, cells)?;
    }

    merged.sort_by_date_then_name();
    Ok(merged)
}

/// Everything the dashboard needs from one aggregate table.
#[derive(Debug, Clone)]
pub struct WinningsView {
    pub ranking: QuantRanking,
    pub cumulative: CumulativeWinnings,
    /// The input table with `cumulative_winnings` merged in.
    pub table: ResultTable,
}

/// Run the full winnings transform over an aggregate table.
pub fn build_view(table: &ResultTable) -> Result<WinningsView, DataError> {
    let ranking = quant_ranking(table)?;
    let cumulative = cumulative_winnings(table)?;
    let merged = merge_cumulative(table, &cumulative)?;
    Ok(WinningsView {
        ranking,
        cumulative,
        table: merged,
    })
}

//! Dashboard view model.
//!
//! Pure functions from the current selection (plotted column, selected
//! quants) to chart data a host UI can render as-is. The figure serialises
//! to plotly-style JSON: `{"data": [traces], "layout": {...}}`.

use crate::data::DataError;
use crate::table::{ResultTable, RANK_COLUMN};
use crate::winnings::{QuantRanking, RankingEntry, WinningsView};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const FIGURE_HEIGHT: &str = "800px";

/// A `{label, value}` pair for a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

/// `"max_drawdown"` → `"Max drawdown"`.
pub fn beautify_column_name(column: &str) -> String {
    let mut chars = column.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    capitalized.replace('_', " ")
}

/// One option per table column, in column order.
pub fn column_options(table: &ResultTable) -> Vec<DropdownOption> {
    table
        .columns()
        .iter()
        .map(|c| DropdownOption {
            label: beautify_column_name(c),
            value: c.clone(),
        })
        .collect()
}

/// One option per quant, in ranking order.
pub fn quant_options(ranking: &QuantRanking) -> Vec<DropdownOption> {
    ranking
        .entries()
        .iter()
        .map(|e| DropdownOption {
            label: e.name.clone(),
            value: e.name.clone(),
        })
        .collect()
}

/// The quants selected when the dashboard opens: the top `n` earners.
pub fn default_selection(ranking: &QuantRanking, n: usize) -> Vec<String> {
    ranking.top(n)
}

/// A line of one quant's values over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub x: Vec<NaiveDate>,
    /// Non-numeric and missing cells are `null` (a gap in the line).
    pub y: Vec<Option<f64>>,
}

/// One trace per selected quant, in order of first appearance in `table`.
///
/// An unknown column yields no traces.
pub fn generate_traces(table: &ResultTable, column: &str, selected: &[String]) -> Vec<Trace> {
    let Some(col) = table.column_index(column) else {
        return Vec::new();
    };
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();

    table
        .names()
        .into_iter()
        .filter(|name| selected.contains(name))
        .map(|name| {
            let (x, y): (Vec<NaiveDate>, Vec<Option<f64>>) = table
                .records()
                .iter()
                .filter(|r| r.name() == name)
                .map(|r| (r.date(), r.cells()[col].as_f64()))
                .unzip();
            Trace {
                kind: "scatter",
                name: name.to_string(),
                x,
                y,
            }
        })
        .collect()
}

/// How the y axis picks its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRange {
    /// Fit the data.
    Auto,
    /// Fit the data, largest value at the bottom.
    Reversed,
}

impl Serialize for AutoRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AutoRange::Auto => serializer.serialize_bool(true),
            AutoRange::Reversed => serializer.serialize_str("reversed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub autorange: AutoRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub height: &'static str,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// Y axis for a column: ranks read best-on-top over the paid places,
/// everything else autoscales.
pub fn axis_for(column: Option<&str>) -> Axis {
    match column {
        Some(RANK_COLUMN) => Axis {
            autorange: AutoRange::Reversed,
            range: Some([0.0, 10.0]),
        },
        _ => Axis {
            autorange: AutoRange::Auto,
            range: None,
        },
    }
}

/// Figure for the current selection. No column or no selection → no traces.
pub fn generate_figure(
    table: &ResultTable,
    column: Option<&str>,
    selected: Option<&[String]>,
) -> Figure {
    let data = match (column, selected) {
        (Some(column), Some(selected)) => generate_traces(table, column, selected),
        _ => Vec::new(),
    };
    Figure {
        data,
        layout: Layout {
            height: FIGURE_HEIGHT,
            yaxis: axis_for(column),
        },
    }
}

/// Initial dashboard state, as served to a host UI.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub ranking: Vec<RankingEntry>,
    pub quants: Vec<DropdownOption>,
    pub columns: Vec<DropdownOption>,
    pub column: String,
    pub selected: Vec<String>,
    pub figure: Figure,
}

/// Snapshot of the dashboard with the top `top_n` quants selected.
pub fn snapshot(view: &WinningsView, column: &str, top_n: usize) -> DashboardSnapshot {
    let selected = default_selection(&view.ranking, top_n);
    let figure = generate_figure(&view.table, Some(column), Some(&selected));
    DashboardSnapshot {
        ranking: view.ranking.entries().to_vec(),
        quants: quant_options(&view.ranking),
        columns: column_options(&view.table),
        column: column.to_string(),
        selected,
        figure,
    }
}

/// Write a snapshot as pretty JSON.
pub fn write_snapshot(snapshot: &DashboardSnapshot, path: &Path) -> Result<(), DataError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| DataError::InvalidValue {
        context: "dashboard snapshot".into(),
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }
    fs::write(path, json).map_err(|e| DataError::io(path, e))
}

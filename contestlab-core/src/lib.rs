//! ContestLab Core — daily contest results collection and winnings analytics.
//!
//! This crate contains:
//! - Configuration (TOML, all fields defaulted)
//! - Collector: business-day calendar, HTTP results source, on-disk daily
//!   store, download orchestration with a consecutive-failure breaker
//! - Aggregator: daily files → one consolidated CSV
//! - Typed results table with pivot / cumulative-sum / forward-fill primitives
//! - Winnings transform: payouts, quant ranking, cumulative winnings
//! - Dashboard view model: selection state → chart data

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod table;
pub mod winnings;

pub use aggregate::{aggregate, load_aggregate, AggregateSummary};
pub use config::{ContestConfig, DashboardConfig};
pub use data::DataError;
pub use table::{Cell, Record, ResultTable};
pub use winnings::{build_view, QuantRanking, WinningsView};

//! Daily results collection: sources, on-disk store, download orchestration.

pub mod calendar;
pub mod circuit_breaker;
pub mod download;
pub mod http;
pub mod provider;
pub mod store;

pub use calendar::business_days;
pub use circuit_breaker::CircuitBreaker;
pub use download::{download_days, DownloadOutcome, DownloadSummary};
pub use http::HttpResultsSource;
pub use provider::{DataError, DownloadProgress, LogProgress, NoProgress, ResultsSource};
pub use store::{DailyFile, DailyStore};

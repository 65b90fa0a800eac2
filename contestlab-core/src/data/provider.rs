//! Results source trait, progress reporting and structured error types.
//!
//! The ResultsSource trait abstracts over where daily contest CSVs come from
//! (the contest website, a fixture directory in tests) so the collector can
//! be driven without a network.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use super::download::DownloadSummary;

/// Structured error types for collector, aggregator and transform operations.
///
/// These are designed to be displayable directly to the operator.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("missing column '{column}' in {context}")]
    MissingColumn { column: String, context: String },

    #[error("duplicate row for '{name}' on {date}")]
    DuplicateRow { name: String, date: NaiveDate },

    #[error("invalid value in {context}: {message}")]
    InvalidValue { context: String, message: String },

    #[error("no daily CSV files found in {} — run `download` first", .dir.display())]
    NoInputFiles { dir: PathBuf },

    #[error("too many days have broken data ({consecutive_failures} consecutive failures)")]
    TooManyFailures { consecutive_failures: u32 },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Trait for sources of daily contest results.
///
/// Implementations fetch the raw CSV body for one contest day. The store sits
/// above this trait; sources know nothing about the data directory.
pub trait ResultsSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the results CSV for a single day. One attempt, no retry.
    fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, DataError>;
}

/// Progress callback for a collector run.
pub trait DownloadProgress {
    /// Called when a day is skipped because its file already exists.
    fn on_skip(&self, date: NaiveDate);

    /// Called when a fetch for a day completes, successfully or not.
    fn on_complete(&self, date: NaiveDate, result: &Result<(), DataError>);

    /// Called when the run is aborted by the failure breaker.
    fn on_abort(&self, consecutive_failures: u32);

    /// Called when the run is over.
    fn on_batch_complete(&self, summary: &DownloadSummary);
}

/// Progress reporter that emits `tracing` events.
pub struct LogProgress;

impl DownloadProgress for LogProgress {
    fn on_skip(&self, date: NaiveDate) {
        tracing::debug!(%date, "already downloaded, skipping");
    }

    fn on_complete(&self, date: NaiveDate, result: &Result<(), DataError>) {
        match result {
            Ok(()) => info!(%date, "day downloaded successfully"),
            Err(e) => warn!(%date, error = %e, "can't download day"),
        }
    }

    fn on_abort(&self, consecutive_failures: u32) {
        warn!(consecutive_failures, "too many days have broken data, aborting");
    }

    fn on_batch_complete(&self, summary: &DownloadSummary) {
        info!(
            total = summary.total,
            skipped = summary.skipped,
            downloaded = summary.downloaded,
            failed = summary.failures.len(),
            "download run finished"
        );
    }
}

/// Progress reporter that discards every event.
pub struct NoProgress;

impl DownloadProgress for NoProgress {
    fn on_skip(&self, _date: NaiveDate) {}
    fn on_complete(&self, _date: NaiveDate, _result: &Result<(), DataError>) {}
    fn on_abort(&self, _consecutive_failures: u32) {}
    fn on_batch_complete(&self, _summary: &DownloadSummary) {}
}

//! Download orchestrator — walks the contest calendar newest-first and fills
//! in missing days.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DownloadProgress, ResultsSource};
use super::store::DailyStore;
use chrono::NaiveDate;

/// Fetch every day in `dates` that the store doesn't have yet.
///
/// Days are visited in descending order. Days already on disk are skipped
/// and leave the failure counter untouched. The run stops as soon as
/// `failure_threshold` fetches in a row have failed.
pub fn download_days(
    source: &dyn ResultsSource,
    store: &DailyStore,
    dates: &[NaiveDate],
    failure_threshold: u32,
    progress: &dyn DownloadProgress,
) -> DownloadSummary {
    let mut ordered = dates.to_vec();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    ordered.dedup();

    let mut breaker = CircuitBreaker::new(failure_threshold);
    let mut summary = DownloadSummary {
        total: ordered.len(),
        skipped: 0,
        downloaded: 0,
        failures: Vec::new(),
        outcome: DownloadOutcome::Completed,
    };

    for date in ordered {
        if store.contains(date) {
            progress.on_skip(date);
            summary.skipped += 1;
            continue;
        }

        let result = download_single(source, store, date);
        progress.on_complete(date, &result);

        match result {
            Ok(()) => {
                breaker.record_success();
                summary.downloaded += 1;
            }
            Err(e) => {
                breaker.record_failure();
                summary.failures.push((date, e));
            }
        }

        if !breaker.is_allowed() {
            let consecutive_failures = breaker.consecutive_failures();
            progress.on_abort(consecutive_failures);
            summary.outcome = DownloadOutcome::Aborted {
                consecutive_failures,
            };
            break;
        }
    }

    progress.on_batch_complete(&summary);
    summary
}

/// Download a single day: fetch → store.
fn download_single(
    source: &dyn ResultsSource,
    store: &DailyStore,
    date: NaiveDate,
) -> Result<(), DataError> {
    let body = source.fetch(date)?;
    store.write(date, &body)?;
    Ok(())
}

/// How a download run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Every missing day was attempted.
    Completed,
    /// The failure breaker tripped; later (older) days were not attempted.
    Aborted { consecutive_failures: u32 },
}

/// Summary of a download run.
#[derive(Debug)]
pub struct DownloadSummary {
    /// Business days in the requested range.
    pub total: usize,
    pub skipped: usize,
    pub downloaded: usize,
    pub failures: Vec<(NaiveDate, DataError)>,
    pub outcome: DownloadOutcome,
}

impl DownloadSummary {
    pub fn aborted(&self) -> bool {
        matches!(self.outcome, DownloadOutcome::Aborted { .. })
    }

    /// Turn an aborted run into an error for callers that treat it as fatal.
    pub fn into_result(self) -> Result<Self, DataError> {
        match self.outcome {
            DownloadOutcome::Aborted {
                consecutive_failures,
            } => Err(DataError::TooManyFailures {
                consecutive_failures,
            }),
            DownloadOutcome::Completed => Ok(self),
        }
    }
}

//! Contest website results source.
//!
//! Fetches one day's results CSV with a plain GET against the configured
//! endpoint. Exactly one attempt per day: retrying is the job of the next
//! collector run, and runs of failures are handled by the circuit breaker.

use super::provider::{DataError, ResultsSource};
use crate::config::ContestConfig;
use chrono::NaiveDate;
use std::time::Duration;

/// Results source backed by the contest website.
pub struct HttpResultsSource {
    client: reqwest::blocking::Client,
    config: ContestConfig,
}

impl HttpResultsSource {
    pub fn new(config: &ContestConfig) -> Result<Self, DataError> {
        // The blocking client defaults to a 30s timeout; the configured value
        // (or none at all) takes precedence.
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout_secs.map(Duration::from_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DataError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

impl ResultsSource for HttpResultsSource {
    fn name(&self) -> &str {
        "contest_website"
    }

    fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, DataError> {
        let url = self.config.daily_url(date);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(format!("{url}: {e}")))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp
            .bytes()
            .map_err(|e| DataError::NetworkUnreachable(format!("{url}: reading body: {e}")))?;
        Ok(body.to_vec())
    }
}

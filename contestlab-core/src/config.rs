//! Collector and dashboard configuration.
//!
//! Stored as a TOML file; every field has a default so an empty file (or no
//! file at all) reproduces the 2018 contest season setup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::DataError;

pub const DEFAULT_BASE_URL: &str = "https://www.quantopian.com/contest/download_results";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_1) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/63.0.3239.132 Safari/537.36";

/// Top-level configuration, passed explicitly to every component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContestConfig {
    /// Results endpoint; the day is appended as `?date=YYYY-MM-DD`.
    pub base_url: String,

    /// First contest day to collect (inclusive).
    pub start_date: NaiveDate,

    /// Last contest day to collect (inclusive).
    pub end_date: NaiveDate,

    /// Consecutive failed days after which a download run is abandoned.
    pub failure_threshold: u32,

    pub user_agent: String,

    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,

    /// Directory holding one `YYYY-MM-DD.csv` per contest day.
    pub data_dir: PathBuf,

    /// Consolidated output of the `aggregate` step.
    pub aggregate_path: PathBuf,

    pub dashboard: DashboardConfig,
}

/// Dashboard snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where to write the JSON snapshot after aggregation. Disabled when unset.
    pub output: Option<PathBuf>,

    /// Column plotted in the snapshot figure.
    pub column: String,

    /// Number of top earners selected by default.
    pub top_n: usize,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2018, 10, 31).unwrap_or_default(),
            failure_threshold: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: None,
            data_dir: PathBuf::from("data"),
            aggregate_path: PathBuf::from("aggregate.csv"),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output: None,
            column: "rank".to_string(),
            top_n: 10,
        }
    }
}

impl ContestConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, DataError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| DataError::Config(format!("parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde can't express.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.base_url.trim().is_empty() {
            return Err(DataError::Config("base_url must not be empty".into()));
        }
        if self.failure_threshold == 0 {
            return Err(DataError::Config("failure_threshold must be at least 1".into()));
        }
        if self.start_date > self.end_date {
            return Err(DataError::Config(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    /// URL of the results file for one contest day.
    pub fn daily_url(&self, date: NaiveDate) -> String {
        format!("{}?date={}", self.base_url, date.format("%Y-%m-%d"))
    }
}

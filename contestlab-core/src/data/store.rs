//! On-disk store of daily result files.
//!
//! Layout: `{data_dir}/{YYYY-MM-DD}.csv`, one file per contest day, holding
//! the response body exactly as the website served it.
//!
//! Writes are atomic (write to .tmp, rename into place) so an interrupted run
//! never leaves a truncated day behind that later runs would skip.

use super::provider::DataError;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A daily results file found in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// The daily results directory.
pub struct DailyStore {
    data_dir: PathBuf,
}

impl DailyStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file for one day: `{data_dir}/{YYYY-MM-DD}.csv`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(format!("{}.csv", date.format(DATE_FORMAT)))
    }

    /// Whether the day has already been downloaded.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.path_for(date).is_file()
    }

    /// Persist one day's body verbatim.
    pub fn write(&self, date: NaiveDate, body: &[u8]) -> Result<PathBuf, DataError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| DataError::io(&self.data_dir, e))?;

        let path = self.path_for(date);
        let tmp_path = path.with_extension("csv.tmp");

        fs::write(&tmp_path, body).map_err(|e| DataError::io(&tmp_path, e))?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::io(&path, e)
        })?;

        Ok(path)
    }

    /// Every daily file in the store, sorted by file name (and so by date).
    ///
    /// A `.csv` file counts when the first ten characters of its name parse
    /// as a date; anything else is skipped with a warning. A missing
    /// directory yields an empty list.
    pub fn daily_files(&self) -> Result<Vec<DailyFile>, DataError> {
        if !self.data_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.data_dir).map_err(|e| DataError::io(&self.data_dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DataError::io(&self.data_dir, e))?;
            let path = entry.path();

            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }

            match date_from_file_name(&path) {
                Some(date) => files.push(DailyFile { date, path }),
                None => warn!(path = %path.display(), "no date in file name, skipping"),
            }
        }

        files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(files)
    }
}

/// Contest day encoded in the first ten characters of a file name.
pub fn date_from_file_name(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let prefix = name.get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

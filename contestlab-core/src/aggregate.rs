//! Consolidates the daily results directory into one CSV.
//!
//! Every run rebuilds the output from scratch: the previous file is removed
//! (best effort), all daily files are read and tagged with the day from their
//! file name, and the union table is written in one go.

use crate::data::{DailyFile, DailyStore, DataError};
use crate::table::ResultTable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What an aggregation run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub output: PathBuf,
    pub files: usize,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Read one daily file, tagging every row with the file's day.
pub fn read_daily_file(file: &DailyFile) -> Result<ResultTable, DataError> {
    let reader = fs::File::open(&file.path).map_err(|e| DataError::io(&file.path, e))?;
    ResultTable::from_csv_reader(reader, &file.path, Some(file.date))
}

/// Concatenate every daily file under `data_dir` into `output`.
///
/// Fails with [`DataError::NoInputFiles`] when there is nothing to
/// aggregate; in that case no output file exists afterwards.
pub fn aggregate(data_dir: &Path, output: &Path) -> Result<AggregateSummary, DataError> {
    // A stale output from an earlier run must never survive a failed one.
    if let Err(e) = fs::remove_file(output) {
        debug!(path = %output.display(), error = %e, "no previous output removed");
    }

    let store = DailyStore::new(data_dir);
    let files = store.daily_files()?;
    info!(dir = %data_dir.display(), files = files.len(), "aggregating daily results");

    let tables = files
        .iter()
        .map(read_daily_file)
        .collect::<Result<Vec<_>, _>>()?;

    let table = ResultTable::concat(tables)?.ok_or_else(|| DataError::NoInputFiles {
        dir: data_dir.to_path_buf(),
    })?;

    write_table(&table, output)?;

    info!(
        output = %output.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "aggregate written"
    );

    Ok(AggregateSummary {
        output: output.to_path_buf(),
        files: files.len(),
        rows: table.len(),
        columns: table.columns().to_vec(),
    })
}

/// Load a consolidated file, sorted by day (stable within a day).
pub fn load_aggregate(path: &Path) -> Result<ResultTable, DataError> {
    let reader = fs::File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut table = ResultTable::from_csv_reader(reader, path, None)?;
    table.sort_by_date();
    Ok(table)
}

/// Write a table to `path`, creating parent directories as needed.
///
/// Atomic: written to a sibling `.tmp` file, then renamed into place.
pub fn write_table(table: &ResultTable, path: &Path) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let file = fs::File::create(&tmp_path).map_err(|e| DataError::io(&tmp_path, e))?;
    if let Err(e) = table.write_csv(std::io::BufWriter::new(file)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(DataError::csv(path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DataError::io(path, e)
    })
}

//! Typed contest results table.
//!
//! A `ResultTable` is an ordered list of columns plus an ordered list of
//! records, one per (contestant name, contest day). Every table carries a
//! `name` and a `date` column; everything else is whatever the contest site
//! publishes (rank, score, volatility, ...), typed per cell.

pub mod pivot;

pub use pivot::{group_sum, Pivot};

use crate::data::DataError;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

pub const NAME_COLUMN: &str = "name";
pub const DATE_COLUMN: &str = "date";
pub const RANK_COLUMN: &str = "rank";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Infer a cell from CSV text: empty/NaN → Null, then integer, then
    /// finite float, else text (kept verbatim).
    ///
    /// Integers must be written canonically (`7`, `-3`); `007` or `+5` stay
    /// text so they are written back unchanged.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "NaN" || trimmed == "nan" {
            return Cell::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            if i.to_string() == trimmed {
                return Cell::Int(i);
            }
            return Cell::Text(raw.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Float(f),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view, used for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Null | Cell::Text(_) => None,
        }
    }

    /// Rank view: a non-negative integer, also accepting integral floats
    /// (`3.0`) as written by tools that widen int columns holding nulls.
    pub fn as_rank(&self) -> Option<u32> {
        match self {
            Cell::Int(i) => u32::try_from(*i).ok(),
            Cell::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
                Some(*f as u32)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(i) => write!(f, "{i}"),
            // Keep the decimal point so the value reads back as a float.
            Cell::Float(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// One row of a results table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    date: NaiveDate,
    cells: Vec<Cell>,
}

impl Record {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Cells aligned with the owning table's columns.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Ordered, typed results table with at most one record per (name, date).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    name_idx: usize,
    date_idx: usize,
    records: Vec<Record>,
    index: HashMap<(String, NaiveDate), usize>,
}

impl ResultTable {
    /// Create an empty table. `columns` must include `name` and `date`.
    pub fn new(columns: Vec<String>) -> Result<Self, DataError> {
        let name_idx = position(&columns, NAME_COLUMN, "table columns")?;
        let date_idx = position(&columns, DATE_COLUMN, "table columns")?;
        Ok(Self {
            columns,
            name_idx,
            date_idx,
            records: Vec::new(),
            index: HashMap::new(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Like `column_index`, but a missing column is an error.
    pub fn require_column(&self, column: &str) -> Result<usize, DataError> {
        position(&self.columns, column, "results table")
    }

    /// The value of `column` in `record`, if the table has that column.
    pub fn cell<'a>(&self, record: &'a Record, column: &str) -> Option<&'a Cell> {
        self.column_index(column).and_then(|i| record.cells.get(i))
    }

    /// The record for a contestant on a day.
    pub fn get(&self, name: &str, date: NaiveDate) -> Option<&Record> {
        self.index
            .get(&(name.to_string(), date))
            .map(|&i| &self.records[i])
    }

    /// Append a record. The `name` and `date` cells are overwritten from the
    /// typed keys so they always agree.
    pub fn push(
        &mut self,
        name: String,
        date: NaiveDate,
        mut cells: Vec<Cell>,
    ) -> Result<(), DataError> {
        if cells.len() != self.columns.len() {
            return Err(DataError::InvalidValue {
                context: format!("row for '{name}' on {date}"),
                message: format!(
                    "expected {} cells, got {}",
                    self.columns.len(),
                    cells.len()
                ),
            });
        }

        let key = (name, date);
        if self.index.contains_key(&key) {
            return Err(DataError::DuplicateRow {
                name: key.0,
                date: key.1,
            });
        }

        cells[self.name_idx] = Cell::Text(key.0.clone());
        cells[self.date_idx] = Cell::Text(date.format(DATE_FORMAT).to_string());

        self.index.insert(key.clone(), self.records.len());
        self.records.push(Record {
            name: key.0,
            date: key.1,
            cells,
        });
        Ok(())
    }

    /// Distinct contestant names in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|r| r.name.as_str())
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Distinct contest days, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Stable sort by day; rows of the same day keep their relative order.
    pub fn sort_by_date(&mut self) {
        self.records.sort_by_key(|r| r.date);
        self.reindex();
    }

    /// Sort by day, then by name.
    pub fn sort_by_date_then_name(&mut self) {
        self.records
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| ((r.name.clone(), r.date), i))
            .collect();
    }

    /// Concatenate tables row-wise.
    ///
    /// Columns are the union of all inputs in first-seen order, with `date`
    /// moved last; cells missing from an input are null. Returns `None` for
    /// zero inputs: there is no meaningful empty concatenation.
    pub fn concat(tables: Vec<ResultTable>) -> Result<Option<ResultTable>, DataError> {
        if tables.is_empty() {
            return Ok(None);
        }

        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if column != DATE_COLUMN && !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        columns.push(DATE_COLUMN.to_string());

        let mut out = ResultTable::new(columns)?;
        for table in tables {
            let mapping: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|c| table.column_index(c))
                .collect();

            for record in table.records {
                let cells = mapping
                    .iter()
                    .map(|src| src.map_or(Cell::Null, |i| record.cells[i].clone()))
                    .collect();
                out.push(record.name, record.date, cells)?;
            }
        }

        Ok(Some(out))
    }

    /// Read a results CSV.
    ///
    /// With `date_override`, every row is tagged with that day (replacing a
    /// `date` column if the file has one, appending it otherwise). Without it
    /// the file must carry a `date` column in `YYYY-MM-DD` form. `source` is
    /// only used in error messages.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        source: &Path,
        date_override: Option<NaiveDate>,
    ) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut columns: Vec<String> = rdr
            .headers()
            .map_err(|e| DataError::csv(source, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let context = source.display().to_string();
        let name_idx = position(&columns, NAME_COLUMN, &context)?;
        let file_date_idx = columns.iter().position(|c| c == DATE_COLUMN);
        if file_date_idx.is_none() {
            if date_override.is_none() {
                return Err(DataError::MissingColumn {
                    column: DATE_COLUMN.into(),
                    context,
                });
            }
            columns.push(DATE_COLUMN.to_string());
        }

        let width = columns.len();
        let mut table = ResultTable::new(columns)?;

        for (line, row) in rdr.records().enumerate() {
            let row = row.map_err(|e| DataError::csv(source, e))?;

            let name = row.get(name_idx).unwrap_or("").trim().to_string();
            if name.is_empty() {
                return Err(DataError::InvalidValue {
                    context: format!("{context}, data row {}", line + 1),
                    message: "empty contestant name".into(),
                });
            }

            let date = match (date_override, file_date_idx) {
                (Some(date), _) => date,
                (None, date_idx) => {
                    let raw = date_idx.and_then(|i| row.get(i)).unwrap_or("").trim();
                    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                        DataError::InvalidValue {
                            context: format!("{context}, data row {}", line + 1),
                            message: format!("bad date '{raw}': {e}"),
                        }
                    })?
                }
            };

            let mut cells: Vec<Cell> = row.iter().map(Cell::parse).collect();
            cells.resize(width, Cell::Null);
            table.push(name, date, cells)?;
        }

        Ok(table)
    }

    /// Write the table as CSV, header first.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for record in &self.records {
            wtr.write_record(record.cells.iter().map(|c| c.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn position(columns: &[String], column: &str, context: &str) -> Result<usize, DataError> {
    columns
        .iter()
        .position(|c| c == column)
        .ok_or_else(|| DataError::MissingColumn {
            column: column.to_string(),
            context: context.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn read(csv: &str, date: Option<NaiveDate>) -> Result<ResultTable, DataError> {
        ResultTable::from_csv_reader(csv.as_bytes(), Path::new("test.csv"), date)
    }

    #[test]
    fn cell_inference() {
        assert_eq!(Cell::parse(""), Cell::Null);
        assert_eq!(Cell::parse("NaN"), Cell::Null);
        assert_eq!(Cell::parse("7"), Cell::Int(7));
        assert_eq!(Cell::parse("-0.25"), Cell::Float(-0.25));
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".into()));
        assert_eq!(Cell::parse("alpha_7"), Cell::Text("alpha_7".into()));
        assert_eq!(Cell::parse("007"), Cell::Text("007".into()));
        assert_eq!(Cell::parse("+5"), Cell::Text("+5".into()));
        assert_eq!(Cell::parse(" 7 "), Cell::Int(7));
    }

    #[test]
    fn cell_text_form() {
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Int(12).to_string(), "12");
        assert_eq!(Cell::Float(2.0).to_string(), "2.0");
        assert_eq!(Cell::Float(0.125).to_string(), "0.125");
        assert_eq!(Cell::Float(1e17).to_string(), "100000000000000000.0");
        assert_eq!(Cell::Text("x y".into()).to_string(), "x y");
    }

    #[test]
    fn rank_view() {
        assert_eq!(Cell::Int(3).as_rank(), Some(3));
        assert_eq!(Cell::Float(3.0).as_rank(), Some(3));
        assert_eq!(Cell::Float(3.5).as_rank(), None);
        assert_eq!(Cell::Int(-1).as_rank(), None);
        assert_eq!(Cell::Null.as_rank(), None);
        assert_eq!(Cell::Text("3rd".into()).as_rank(), None);
    }

    #[test]
    fn reads_daily_file_with_override() {
        let table = read("name,rank,score\nalice,1,0.9\nbob,2,0.7\n", Some(d(2018, 1, 2))).unwrap();

        assert_eq!(table.columns(), &["name", "rank", "score", "date"]);
        assert_eq!(table.len(), 2);
        let bob = table.get("bob", d(2018, 1, 2)).unwrap();
        assert_eq!(table.cell(bob, "rank"), Some(&Cell::Int(2)));
        assert_eq!(table.cell(bob, "date"), Some(&Cell::Text("2018-01-02".into())));
    }

    #[test]
    fn override_replaces_existing_date_column() {
        let table = read("date,name\n1999-01-01,alice\n", Some(d(2018, 1, 2))).unwrap();
        assert_eq!(table.columns(), &["date", "name"]);
        assert_eq!(table.records()[0].date(), d(2018, 1, 2));
    }

    #[test]
    fn reads_consolidated_file_dates() {
        let table = read("name,rank,date\nalice,1,2018-01-03\nalice,4,2018-01-02\n", None).unwrap();
        assert_eq!(table.dates(), vec![d(2018, 1, 2), d(2018, 1, 3)]);
    }

    #[test]
    fn missing_name_column_is_rejected() {
        let err = read("rank\n1\n", Some(d(2018, 1, 2))).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "name"));
    }

    #[test]
    fn missing_date_column_without_override_is_rejected() {
        assert!(read("name,rank\nalice,1\n", None).is_err());
    }

    #[test]
    fn duplicate_name_on_same_day_is_rejected() {
        let err = read("name,rank\nalice,1\nalice,2\n", Some(d(2018, 1, 2))).unwrap_err();
        assert!(matches!(err, DataError::DuplicateRow { .. }));
    }

    #[test]
    fn concat_unions_columns_with_date_last() {
        let a = read("name,rank\nalice,1\n", Some(d(2018, 1, 2))).unwrap();
        let b = read("name,score,rank\nbob,0.5,3\n", Some(d(2018, 1, 3))).unwrap();

        let table = ResultTable::concat(vec![a, b]).unwrap().unwrap();

        assert_eq!(table.columns(), &["name", "rank", "score", "date"]);
        assert_eq!(table.len(), 2);
        let alice = table.get("alice", d(2018, 1, 2)).unwrap();
        assert_eq!(table.cell(alice, "score"), Some(&Cell::Null));
        let bob = table.get("bob", d(2018, 1, 3)).unwrap();
        assert_eq!(table.cell(bob, "rank"), Some(&Cell::Int(3)));
    }

    #[test]
    fn concat_of_nothing_is_none() {
        assert!(ResultTable::concat(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn names_in_first_appearance_order() {
        let table = read(
            "name,rank,date\ncarol,1,2018-01-02\nalice,2,2018-01-02\ncarol,1,2018-01-03\n",
            None,
        )
        .unwrap();
        assert_eq!(table.names(), vec!["carol", "alice"]);
    }

    #[test]
    fn sort_by_date_is_stable_and_reindexes() {
        let mut table = read(
            "name,date\nzed,2018-01-03\nbob,2018-01-02\namy,2018-01-02\n",
            None,
        )
        .unwrap();
        table.sort_by_date();

        let names: Vec<_> = table.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["bob", "amy", "zed"]);
        assert_eq!(table.get("zed", d(2018, 1, 3)).unwrap().name(), "zed");

        table.sort_by_date_then_name();
        let names: Vec<_> = table.records().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["amy", "bob", "zed"]);
    }

    #[test]
    fn unusual_numbers_survive_write_and_read() {
        let csv = "name,code,delta,volume,date\n\
                   alice,007,+5,100000000000000000.0,2018-01-02\n";
        let table = read(csv, None).unwrap();
        let alice = table.get("alice", d(2018, 1, 2)).unwrap();
        assert_eq!(table.cell(alice, "volume"), Some(&Cell::Float(1e17)));

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(std::str::from_utf8(&out).unwrap(), csv);

        let again = read(std::str::from_utf8(&out).unwrap(), None).unwrap();
        assert_eq!(again, table);
    }

    #[test]
    fn write_csv_preserves_cells() {
        let table = read("name,rank,score\nalice,1,2.0\nbob,,x\n", Some(d(2018, 1, 2))).unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,rank,score,date\nalice,1,2.0,2018-01-02\nbob,,x,2018-01-02\n"
        );
    }
}

//! Name × date pivot and the row-wise primitives the winnings transform
//! is built from.
//!
//! Row keys keep first-appearance order; the date axis is the sorted union
//! of every date seen. Cells nobody reported are `None`.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::ops::Add;

/// Dense name × date matrix of optional values.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot<T> {
    names: Vec<String>,
    dates: Vec<NaiveDate>,
    /// One row per name, each as long as `dates`.
    cells: Vec<Vec<Option<T>>>,
    name_index: HashMap<String, usize>,
}

impl<T: Copy> Pivot<T> {
    /// Build a pivot from long-form entries.
    ///
    /// A `None` value still registers its name and date on the axes. When a
    /// (name, date) pair repeats, the later entry wins.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, NaiveDate, Option<T>)>,
    {
        let entries: Vec<_> = entries.into_iter().collect();

        let mut names = Vec::new();
        let mut name_index = HashMap::new();
        let mut all_dates = BTreeSet::new();
        for (name, date, _) in &entries {
            if !name_index.contains_key(name) {
                name_index.insert(name.clone(), names.len());
                names.push(name.clone());
            }
            all_dates.insert(*date);
        }
        let dates: Vec<NaiveDate> = all_dates.into_iter().collect();
        let date_index: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut cells = vec![vec![None; dates.len()]; names.len()];
        for (name, date, value) in entries {
            let row = name_index[&name];
            let col = date_index[&date];
            cells[row][col] = value;
        }

        Self {
            names,
            dates,
            cells,
            name_index,
        }
    }

    /// Row keys in first-appearance order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Date axis, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Full row for a name, aligned with `dates()`.
    pub fn row(&self, name: &str) -> Option<&[Option<T>]> {
        self.name_index.get(name).map(|&i| self.cells[i].as_slice())
    }

    pub fn get(&self, name: &str, date: NaiveDate) -> Option<T> {
        let row = self.row(name)?;
        let col = self.dates.binary_search(&date).ok()?;
        row[col]
    }

    /// Carry the last known value of each row forward over `None` cells.
    /// Leading `None`s stay `None`.
    pub fn forward_fill_rows(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|row| {
                let mut last = None;
                row.iter()
                    .map(|cell| {
                        if cell.is_some() {
                            last = *cell;
                        }
                        last
                    })
                    .collect()
            })
            .collect();
        self.with_cells(cells)
    }

    /// Long form again, row by row, dropping `None` cells.
    pub fn unpivot(&self) -> Vec<(String, NaiveDate, T)> {
        let mut out = Vec::new();
        for (name, row) in self.names.iter().zip(&self.cells) {
            for (date, cell) in self.dates.iter().zip(row) {
                if let Some(value) = cell {
                    out.push((name.clone(), *date, *value));
                }
            }
        }
        out
    }

    fn with_cells(&self, cells: Vec<Vec<Option<T>>>) -> Self {
        Self {
            names: self.names.clone(),
            dates: self.dates.clone(),
            cells,
            name_index: self.name_index.clone(),
        }
    }
}

impl<T: Copy + Add<Output = T>> Pivot<T> {
    /// Running sum along each row. `None` cells are skipped by the sum and
    /// stay `None` in the output.
    pub fn cumsum_rows(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|row| {
                let mut acc: Option<T> = None;
                row.iter()
                    .map(|cell| {
                        let value = (*cell)?;
                        let total = match acc {
                            Some(a) => a + value,
                            None => value,
                        };
                        acc = Some(total);
                        Some(total)
                    })
                    .collect()
            })
            .collect();
        self.with_cells(cells)
    }
}

/// Sum values per key, keys in first-appearance order.
pub fn group_sum<V, I>(entries: I) -> Vec<(String, V)>
where
    V: Copy + Add<Output = V> + Default,
    I: IntoIterator<Item = (String, V)>,
{
    let mut out: Vec<(String, V)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (key, value) in entries {
        match index.get(&key) {
            Some(&i) => out[i].1 = out[i].1 + value,
            None => {
                index.insert(key.clone(), out.len());
                out.push((key, V::default() + value));
            }
        }
    }
    out
}

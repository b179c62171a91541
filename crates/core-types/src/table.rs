use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Row-oriented wire form of a table: date -> symbol -> value (`null` when missing).
type RowMap = BTreeMap<NaiveDate, BTreeMap<String, Option<f64>>>;

/// A date-indexed table of observations with one column per symbol.
///
/// All columns share a single, strictly increasing date axis. A cell is `None` when the
/// symbol has no observation on that date; rows where every cell is `None` are allowed.
/// Non-finite inputs (NaN, infinities) are stored as `None`, so a `Some` cell is always a
/// real number and "missing" can never be mistaken for a computed value.
///
/// Prices and returns share this shape, see [`PriceTable`] and [`ReturnTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RowMap", into = "RowMap")]
pub struct TimeSeriesTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

/// Adjusted closing prices, one column per instrument.
pub type PriceTable = TimeSeriesTable;

/// Fractional period-over-period changes derived from a [`PriceTable`].
pub type ReturnTable = TimeSeriesTable;

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl TimeSeriesTable {
    /// Creates an empty table with no dates and no symbols.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a date axis and a list of `(symbol, values)` columns.
    ///
    /// The date axis must be strictly increasing, symbols must be unique and every column
    /// must have exactly one value per date.
    pub fn from_columns<S: Into<String>>(
        dates: Vec<NaiveDate>,
        columns: Vec<(S, Vec<Option<f64>>)>,
    ) -> Result<Self, CoreError> {
        if let Some(pair) = dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(CoreError::InvalidInput(
                "dates".to_string(),
                format!(
                    "axis must be strictly increasing, found {} before {}",
                    pair[0], pair[1]
                ),
            ));
        }

        let mut table = Self {
            dates,
            symbols: Vec::with_capacity(columns.len()),
            columns: Vec::with_capacity(columns.len()),
        };

        for (symbol, values) in columns {
            let symbol = symbol.into();
            if table.symbols.contains(&symbol) {
                return Err(CoreError::DuplicateSymbol(symbol));
            }
            if values.len() != table.dates.len() {
                return Err(CoreError::LengthMismatch {
                    symbol,
                    expected: table.dates.len(),
                    found: values.len(),
                });
            }
            table.symbols.push(symbol);
            table.columns.push(values.into_iter().map(finite).collect());
        }

        Ok(table)
    }

    /// Builds a table from `(date, symbol, value)` observations in any order.
    ///
    /// Dates are sorted, symbols keep the order in which they were first seen, and cells
    /// without an observation are `None`. A later observation for the same cell replaces an
    /// earlier one.
    pub fn from_observations<I, S>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, S, Option<f64>)>,
        S: Into<String>,
    {
        let mut rows = RowMap::new();
        let mut symbols: Vec<String> = Vec::new();

        for (date, symbol, value) in observations {
            let symbol = symbol.into();
            if !symbols.contains(&symbol) {
                symbols.push(symbol.clone());
            }
            rows.entry(date).or_default().insert(symbol, value);
        }

        Self::from_rows(&rows, symbols)
    }

    fn from_rows(rows: &RowMap, symbols: Vec<String>) -> Self {
        let dates = rows.keys().copied().collect();
        let columns = symbols
            .iter()
            .map(|symbol| {
                rows.values()
                    .map(|row| finite(row.get(symbol).copied().flatten()))
                    .collect()
            })
            .collect();

        Self {
            dates,
            symbols,
            columns,
        }
    }

    /// True when the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    /// Number of rows (dates).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.position(symbol).is_some()
    }

    fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// The values of one column, aligned with [`dates`](Self::dates).
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.position(symbol).map(|idx| self.columns[idx].as_slice())
    }

    /// Iterates over `(symbol, values)` in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.symbols
            .iter()
            .zip(&self.columns)
            .map(|(symbol, values)| (symbol.as_str(), values.as_slice()))
    }

    /// The value for one cell, `None` when the date, the symbol or the observation is missing.
    pub fn value(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(symbol).and_then(|values| values[row])
    }

    /// Iterates over every cell as `(date, symbol, value)`, row by row.
    pub fn observations(&self) -> impl Iterator<Item = (NaiveDate, &str, Option<f64>)> {
        self.dates.iter().enumerate().flat_map(move |(row, date)| {
            self.columns()
                .map(move |(symbol, values)| (*date, symbol, values[row]))
        })
    }

    /// A table restricted to the requested symbols, in the requested order.
    ///
    /// Symbols not present in the table are skipped. The date axis is kept as is.
    pub fn select(&self, symbols: &[&str]) -> Self {
        let mut selected = Self {
            dates: self.dates.clone(),
            symbols: Vec::with_capacity(symbols.len()),
            columns: Vec::with_capacity(symbols.len()),
        };
        for symbol in symbols {
            if selected.symbols.iter().any(|s| s == symbol) {
                continue;
            }
            if let Some(values) = self.column(symbol) {
                selected.symbols.push((*symbol).to_string());
                selected.columns.push(values.to_vec());
            }
        }
        selected
    }

    /// Applies `f` to every column, keeping symbols and dates.
    ///
    /// `f` receives a full column and must return a column of the same length.
    pub fn map_columns<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&[Option<f64>]) -> Vec<Option<f64>>,
    {
        let columns = self
            .columns
            .iter()
            .map(|values| {
                let mapped: Vec<Option<f64>> = f(values).into_iter().map(finite).collect();
                debug_assert_eq!(mapped.len(), values.len());
                mapped
            })
            .collect();

        Self {
            dates: self.dates.clone(),
            symbols: self.symbols.clone(),
            columns,
        }
    }

    /// Keeps only the rows for which `keep(row_index)` is true.
    fn retain_rows<F>(self, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.dates.len()).filter(|row| keep(*row)).collect();
        Self {
            dates: rows.iter().map(|row| self.dates[*row]).collect(),
            columns: self
                .columns
                .iter()
                .map(|values| rows.iter().map(|row| values[*row]).collect())
                .collect(),
            symbols: self.symbols,
        }
    }

    /// Removes every row in which no column has a value.
    pub fn drop_empty_rows(self) -> Self {
        let keep: Vec<bool> = (0..self.len())
            .map(|row| self.columns.iter().any(|values| values[row].is_some()))
            .collect();
        self.retain_rows(|row| keep[row])
    }

    /// Keeps the rows whose date lies within `[start, end]`. An open bound is unbounded.
    pub fn between(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let keep: Vec<bool> = self
            .dates
            .iter()
            .map(|date| start.is_none_or(|s| *date >= s) && end.is_none_or(|e| *date <= e))
            .collect();
        self.retain_rows(|row| keep[row])
    }

    /// Outer-joins two tables on their date axes.
    ///
    /// The result carries the union of dates and the union of symbols (this table's symbols
    /// first). Where both tables hold the same symbol, a defined value in `other` wins.
    pub fn merge(&self, other: &Self) -> Self {
        let mut rows = RowMap::new();
        let mut symbols = self.symbols.clone();
        for symbol in &other.symbols {
            if !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }

        for table in [self, other] {
            for date in &table.dates {
                rows.entry(*date).or_default();
            }
            for (date, symbol, value) in table.observations() {
                if value.is_some() {
                    rows.entry(date).or_default().insert(symbol.to_string(), value);
                }
            }
        }

        Self::from_rows(&rows, symbols)
    }
}

impl From<RowMap> for TimeSeriesTable {
    fn from(rows: RowMap) -> Self {
        let mut symbols: Vec<String> = Vec::new();
        for row in rows.values() {
            for symbol in row.keys() {
                if !symbols.contains(symbol) {
                    symbols.push(symbol.clone());
                }
            }
        }
        Self::from_rows(&rows, symbols)
    }
}

impl From<TimeSeriesTable> for RowMap {
    fn from(table: TimeSeriesTable) -> Self {
        table
            .dates
            .iter()
            .enumerate()
            .map(|(row, date)| {
                let cells = table
                    .symbols
                    .iter()
                    .zip(&table.columns)
                    .map(|(symbol, values)| (symbol.clone(), values[row]))
                    .collect();
                (*date, cells)
            })
            .collect()
    }
}

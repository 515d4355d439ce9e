//! In-memory tabular datasets.
//!
//! A [`Dataset`] is a header row plus rows of string cells, as read from a
//! CSV file. Column types are inferred on demand rather than fixed at load.

use crate::error::{FellowshipError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-blank cell parses as a number.
    Numeric,
    /// At least one non-blank cell is not a number.
    Text,
    /// Every cell is blank.
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Empty => write!(f, "empty"),
        }
    }
}

/// A named table loaded into memory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub source: Option<PathBuf>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Create a dataset from already-split rows.
    pub fn new(name: &str, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            source: None,
            columns,
            rows,
            loaded_at: Utc::now(),
        }
    }

    /// Load a CSV file. The first record is the header row.
    pub fn from_csv_path(name: &str, path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut dataset = Self::from_csv_reader(name, file)?;
        dataset.source = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Parse CSV from any reader. Records may differ in length from the header.
    pub fn from_csv_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(FellowshipError::Dataset(format!("'{}' has no header row", name)));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(Self::new(name, columns, rows))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Position of a column, or an error naming the available columns.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column).ok_or_else(|| {
            FellowshipError::InvalidInput(format!(
                "Column '{}' not found in '{}'. Available columns: {}",
                column,
                self.name,
                self.columns.join(", ")
            ))
        })
    }

    /// Cell at (row, column); missing cells in short rows are `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Non-blank cells of a column, in row order.
    pub fn values(&self, column: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    /// Cells of a column that parse as numbers.
    pub fn numeric_values(&self, column: usize) -> Vec<f64> {
        self.values(column).filter_map(parse_number).collect()
    }

    /// Infer the type of a column from its non-blank cells.
    pub fn column_kind(&self, column: usize) -> ColumnKind {
        let mut saw_value = false;
        for value in self.values(column) {
            if parse_number(value).is_none() {
                return ColumnKind::Text;
            }
            saw_value = true;
        }
        if saw_value {
            ColumnKind::Numeric
        } else {
            ColumnKind::Empty
        }
    }
}

/// Parse a cell as a number, accepting surrounding whitespace.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

//! Tabular data: dataset snapshots and result tables.
//!
//! A [`Table`] is an ordered list of column names plus rows of [`Value`]s.
//! The same type serves as the immutable dataset snapshot a request runs
//! against (shared behind an `Arc`) and as the [`ResultTable`] handed to the
//! renderer.
//!
//! Column kinds are not declared. They are inferred from the data the first
//! time they are needed and cached for the lifetime of the table.

mod loader;

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

/// Errors raised while building or loading a table.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type DataResult<T> = Result<T, DataError>;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Read a raw text cell: empty is null, finite numbers are numeric,
    /// anything else is text.
    pub fn parse_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(trimmed.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The cell as text. Numbers use their shortest decimal form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(n.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Order two cells of a column of the given kind.
    ///
    /// Nulls and cells that do not fit the kind compare as `None`; callers
    /// decide where those go.
    pub fn compare(&self, other: &Value, kind: ValueKind) -> Option<Ordering> {
        match kind {
            ValueKind::Numeric => Some(self.as_number()?.total_cmp(&other.as_number()?)),
            ValueKind::Textual => Some(self.as_text()?.cmp(&other.as_text()?)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Numeric,
    Textual,
}

impl ValueKind {
    /// Numeric if there is at least one non-null cell and every non-null
    /// cell is a number.
    fn infer<'a>(cells: impl Iterator<Item = &'a Value>) -> Self {
        let mut seen = false;
        for cell in cells {
            match cell {
                Value::Null => {}
                Value::Number(_) => seen = true,
                Value::Text(_) => return ValueKind::Textual,
            }
        }
        if seen {
            ValueKind::Numeric
        } else {
            ValueKind::Textual
        }
    }
}

/// Rows of values under named columns.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    #[serde(skip)]
    kinds: OnceLock<Vec<ValueKind>>,
}

/// The table produced by executing a query.
pub type ResultTable = Table;

impl Table {
    /// Build a table, checking that every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> DataResult<Self> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(DataError::RowWidth {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            kinds: OnceLock::new(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The inferred kind of the column at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn column_kind(&self, index: usize) -> ValueKind {
        self.column_kinds()[index]
    }

    /// Inferred kinds of every column, in column order.
    pub fn column_kinds(&self) -> &[ValueKind] {
        self.kinds.get_or_init(|| {
            (0..self.columns.len())
                .map(|i| ValueKind::infer(self.rows.iter().map(|row| &row[i])))
                .collect()
        })
    }

    /// A table with the same columns and column kinds but different rows.
    ///
    /// Kinds carry over so that a column does not change kind just because
    /// a filter removed all of its numbers.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
            kinds: OnceLock::from(self.column_kinds().to_vec()),
        }
    }

    /// A table with explicitly given column kinds.
    pub(crate) fn with_kinds(
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        kinds: Vec<ValueKind>,
    ) -> Self {
        Self {
            columns,
            rows,
            kinds: OnceLock::from(kinds),
        }
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

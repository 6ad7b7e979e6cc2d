//! Rate tables: one row per key with one or more nullable rate columns.

use serde::Serialize;

use super::{Rate, ShapeError};

/// Column name for win rates.
pub const WIN_RATE: &str = "win_rate";
/// Column name for pick (selection) rates.
pub const PICK_RATE: &str = "pick_rate";

/// One row of a [`RateTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    pub key: String,
    /// One entry per rate column; `None` is "no data".
    pub rates: Vec<Option<Rate>>,
}

impl RateRow {
    pub fn new(key: impl Into<String>, rates: Vec<Option<Rate>>) -> Self {
        Self {
            key: key.into(),
            rates,
        }
    }
}

/// A table of rate rows in a meaningful original order.
///
/// Win/pick tables are keyed by entity with columns `[win_rate, pick_rate]`;
/// matchup tables are keyed by opponent count with a single `win_rate` column.
/// Derived tables (filtered, sorted) are new values; nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    key_label: String,
    columns: Vec<String>,
    rows: Vec<RateRow>,
}

impl RateTable {
    pub fn new(
        key_label: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<RateRow>,
    ) -> Result<Self, ShapeError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(ShapeError::DuplicateColumn(column.clone()));
            }
        }
        for row in &rows {
            if row.rates.len() != columns.len() {
                return Err(ShapeError::RowWidth {
                    key: row.key.clone(),
                    expected: columns.len(),
                    actual: row.rates.len(),
                });
            }
        }
        Ok(Self {
            key_label: key_label.into(),
            columns,
            rows,
        })
    }

    pub fn key_label(&self) -> &str {
        &self.key_label
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RateRow] {
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

    /// Values of one column in row order.
    pub fn column(&self, name: &str) -> Option<Vec<Option<Rate>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.rates[idx]).collect())
    }

    pub fn row(&self, key: &str) -> Option<&RateRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    /// Assemble a table whose rows are known to match `columns` in width.
    pub(crate) fn from_parts(key_label: &str, columns: Vec<String>, rows: Vec<RateRow>) -> Self {
        debug_assert!(rows.iter().all(|r| r.rates.len() == columns.len()));
        Self {
            key_label: key_label.to_string(),
            columns,
            rows,
        }
    }

    /// A table with the same shape and a different set of rows.
    ///
    /// Only callers inside the crate use this, after deriving `rows` from
    /// `self`, so row width already matches.
    pub(crate) fn with_rows(&self, rows: Vec<RateRow>) -> Self {
        Self {
            key_label: self.key_label.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}

//! Rate table pipeline: filter → sort → format, always in that order.
//!
//! Filtering and sorting produce new [`RateTable`]s with numeric rates.
//! Formatting turns a rate table into a [`FormattedTable`] of display cells;
//! that type has no conversion back into a rate table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{Rate, RateRow, RateTable};
use crate::format::{format_rate, Cell};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("unknown column '{column}' (available: {})", available.join(", "))]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("minimum rate {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("unknown sort mode '{0}' (expected by-count, ascending or descending)")]
    UnknownSortMode(String),
}

/// Row order of a rendered table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Original row order (rows are stored by opponent count or store order).
    #[default]
    #[serde(alias = "default")]
    ByCount,
    Ascending,
    Descending,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::ByCount, SortMode::Ascending, SortMode::Descending];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::ByCount => "by-count",
            SortMode::Ascending => "ascending",
            SortMode::Descending => "descending",
        }
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            SortMode::ByCount => "By count",
            SortMode::Ascending => "Ascending",
            SortMode::Descending => "Descending",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "by-count" | "by_count" | "default" | "count" => Ok(SortMode::ByCount),
            "ascending" | "asc" => Ok(SortMode::Ascending),
            "descending" | "desc" => Ok(SortMode::Descending),
            _ => Err(TableError::UnknownSortMode(s.to_string())),
        }
    }
}

/// Drop rows whose `column` rate is below `min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFilter {
    pub column: String,
    pub min: f64,
}

impl RateFilter {
    pub fn new(column: impl Into<String>, min: f64) -> Self {
        Self {
            column: column.into(),
            min,
        }
    }

    fn keeps(&self, rate: Option<Rate>) -> bool {
        match rate {
            Some(r) => r.value() >= self.min,
            None => self.min <= 0.0,
        }
    }
}

/// Everything [`render`] needs to turn a rate table into display rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub filter: Option<RateFilter>,
    pub sort_column: String,
    pub sort: SortMode,
    pub no_data: String,
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRow {
    pub key: String,
    pub cells: Vec<Cell>,
}

/// A rendered table: display strings only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedTable {
    pub key_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<FormattedRow>,
}

impl FormattedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key.as_str())
    }
}

fn column_index(table: &RateTable, column: &str) -> Result<usize, TableError> {
    table
        .column_index(column)
        .ok_or_else(|| TableError::UnknownColumn {
            column: column.to_string(),
            available: table.columns().to_vec(),
        })
}

/// Keep rows whose filter-column rate is at least `filter.min`.
///
/// A row with no data in the filter column is kept only when `min` is zero.
pub fn filter_rows(table: &RateTable, filter: &RateFilter) -> Result<RateTable, TableError> {
    if !(0.0..=1.0).contains(&filter.min) {
        return Err(TableError::InvalidThreshold(filter.min));
    }
    let idx = column_index(table, &filter.column)?;
    let rows: Vec<RateRow> = table
        .rows()
        .iter()
        .filter(|row| filter.keeps(row.rates[idx]))
        .cloned()
        .collect();
    Ok(table.with_rows(rows))
}

/// Absent rates order after every present rate, whichever the direction.
fn compare(a: Option<Rate>, b: Option<Rate>, mode: SortMode) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if mode == SortMode::Descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order rows by the numeric rate in `column`. Stable; `ByCount` keeps the original order.
pub fn sort_rows(table: &RateTable, column: &str, mode: SortMode) -> Result<RateTable, TableError> {
    let idx = column_index(table, column)?;
    let mut rows = table.rows().to_vec();
    if mode != SortMode::ByCount {
        rows.sort_by(|a, b| compare(a.rates[idx], b.rates[idx], mode));
    }
    Ok(table.with_rows(rows))
}

/// Render every rate as a percentage, or `no_data` when absent.
pub fn format_table(table: &RateTable, no_data: &str) -> FormattedTable {
    FormattedTable {
        key_label: table.key_label().to_string(),
        columns: table.columns().to_vec(),
        rows: table
            .rows()
            .iter()
            .map(|row| FormattedRow {
                key: row.key.clone(),
                cells: row.rates.iter().map(|r| format_rate(*r, no_data)).collect(),
            })
            .collect(),
    }
}

/// Run the full pipeline.
pub fn render(table: &RateTable, query: &TableQuery) -> Result<FormattedTable, TableError> {
    let filtered = match &query.filter {
        Some(filter) => filter_rows(table, filter)?,
        None => table.clone(),
    };
    let sorted = sort_rows(&filtered, &query.sort_column, query.sort)?;
    Ok(format_table(&sorted, &query.no_data))
}

//! Domain types: rates, time series tables, rate tables, matchup tables.

pub mod keyed;
pub mod matchup;
pub mod rate;
pub mod rates;
pub mod series;

pub use keyed::Keyed;
pub use matchup::{matchup_rate_table, MatchupRow, MatchupTable, OPPONENT_COUNT};
pub use rate::{Rate, RateError};
pub use rates::{RateRow, RateTable, PICK_RATE, WIN_RATE};
pub use series::{MetricColumn, TimeSeriesTable};

use thiserror::Error;

/// A table was assembled with inconsistent shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("row '{key}' has {actual} rates, expected {expected}")]
    RowWidth {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate matchup cell: {entity} vs {role} x{opponent_count}")]
    DuplicateMatchup {
        entity: String,
        role: String,
        opponent_count: u8,
    },
}

//! Structured errors for loading and writing the data store.
//!
//! Every variant names the file involved so a failed startup load can say
//! exactly which data file is at fault.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{RateError, ShapeError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: parquet I/O error: {reason}", path.display())]
    Parquet { path: PathBuf, reason: String },

    #[error("{}: missing column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: column '{column}' has unsupported type {dtype}", path.display())]
    ColumnType {
        path: PathBuf,
        column: String,
        dtype: String,
    },

    #[error("{}: row {row}: {reason}", path.display())]
    InvalidRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("{}: row {row}: invalid {column}: {source}", path.display())]
    InvalidRate {
        path: PathBuf,
        row: usize,
        column: String,
        #[source]
        source: RateError,
    },

    #[error("{}: {source}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },

    #[error("{}: malformed manifest: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// The data file this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Io { path, .. }
            | StoreError::Parquet { path, .. }
            | StoreError::MissingColumn { path, .. }
            | StoreError::ColumnType { path, .. }
            | StoreError::InvalidRow { path, .. }
            | StoreError::InvalidRate { path, .. }
            | StoreError::Shape { path, .. }
            | StoreError::Manifest { path, .. } => path,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parquet(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::Parquet {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_file() {
        let err = StoreError::MissingColumn {
            path: PathBuf::from("data/win_pick_rates.parquet"),
            column: "pick_rate".into(),
        };
        assert_eq!(
            err.to_string(),
            "data/win_pick_rates.parquet: missing column 'pick_rate'"
        );
        assert_eq!(err.path(), Path::new("data/win_pick_rates.parquet"));
    }

    #[test]
    fn rate_errors_carry_row_and_column() {
        let err = StoreError::InvalidRate {
            path: PathBuf::from("m.parquet"),
            row: 7,
            column: "win_rate".into(),
            source: RateError::OutOfRange(1.2),
        };
        assert_eq!(
            err.to_string(),
            "m.parquet: row 7: invalid win_rate: rate 1.2 is outside [0, 1]"
        );
    }
}

//! Percent formatting of rates. This is the last stage of every table
//! pipeline: a [`Cell`] is display text and has no way back into a rate table
//! except through [`parse_percent`].

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::domain::{Rate, RateError};

/// Marker rendered in place of an absent rate.
pub const DEFAULT_NO_DATA: &str = "no data available";

/// A formatted rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Two-decimal percentage, e.g. `"12.34%"`.
    Percent(String),
    /// The no-data marker the table was formatted with.
    NoData(String),
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Percent(s) | Cell::NoData(s) => s,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Cell::NoData(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Format a rate as a two-decimal percentage, or the no-data marker.
pub fn format_rate(rate: Option<Rate>, no_data: &str) -> Cell {
    match rate {
        Some(r) => Cell::Percent(format!("{:.2}%", r.percent())),
        None => Cell::NoData(no_data.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PercentParseError {
    #[error("'{0}' is not a percentage")]
    NotPercent(String),

    #[error("'{text}' is not a valid rate: {source}")]
    Rate {
        text: String,
        #[source]
        source: RateError,
    },
}

/// Parse formatted text back into a rate. The no-data marker parses to `None`.
pub fn parse_percent(text: &str, no_data: &str) -> Result<Option<Rate>, PercentParseError> {
    let text = text.trim();
    if text == no_data {
        return Ok(None);
    }
    let number = text
        .strip_suffix('%')
        .and_then(|n| n.trim().parse::<f64>().ok())
        .ok_or_else(|| PercentParseError::NotPercent(text.to_string()))?;
    Rate::new(number / 100.0)
        .map(Some)
        .map_err(|source| PercentParseError::Rate {
            text: text.to_string(),
            source,
        })
}

//! Probability-like rate values (win rate, pick rate).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors constructing a [`Rate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RateError {
    #[error("rate {0} is outside [0, 1]")]
    OutOfRange(f64),

    #[error("rate is not a finite number")]
    NotFinite,
}

/// A value in `[0, 1]`.
///
/// Absence ("no data") is modelled as `Option<Rate>::None`, never as a
/// sentinel number, so a recorded zero and a missing value stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rate(f64);

impl Rate {
    pub const ZERO: Rate = Rate(0.0);
    pub const ONE: Rate = Rate(1.0);

    pub fn new(value: f64) -> Result<Self, RateError> {
        if !value.is_finite() {
            return Err(RateError::NotFinite);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(RateError::OutOfRange(value));
        }
        // Normalise -0.0 so hashing and ordering see a single zero.
        Ok(Rate(value + 0.0))
    }

    /// Interpret a nullable stored value: `None` and NaN both mean "no data".
    pub fn from_stored(value: Option<f64>) -> Result<Option<Self>, RateError> {
        match value {
            None => Ok(None),
            Some(v) if v.is_nan() => Ok(None),
            Some(v) => Rate::new(v).map(Some),
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The rate scaled to percent (`0.1234` → `12.34`).
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl Eq for Rate {}

impl PartialOrd for Rate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Always finite, so total_cmp agrees with numeric order.
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Rate {
    type Error = RateError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rate::new(value)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> f64 {
        rate.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_closed_unit_interval() {
        assert_eq!(Rate::new(0.0).unwrap(), Rate::ZERO);
        assert_eq!(Rate::new(1.0).unwrap(), Rate::ONE);
        assert_eq!(Rate::new(0.37).unwrap().value(), 0.37);
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert_eq!(Rate::new(-0.01), Err(RateError::OutOfRange(-0.01)));
        assert_eq!(Rate::new(1.5), Err(RateError::OutOfRange(1.5)));
        assert_eq!(Rate::new(f64::NAN), Err(RateError::NotFinite));
        assert_eq!(Rate::new(f64::INFINITY), Err(RateError::NotFinite));
    }

    #[test]
    fn stored_nan_and_null_are_no_data() {
        assert_eq!(Rate::from_stored(None).unwrap(), None);
        assert_eq!(Rate::from_stored(Some(f64::NAN)).unwrap(), None);
        assert_eq!(Rate::from_stored(Some(0.0)).unwrap(), Some(Rate::ZERO));
        assert!(Rate::from_stored(Some(2.0)).is_err());
    }

    #[test]
    fn negative_zero_is_normalised() {
        let z = Rate::new(-0.0).unwrap();
        assert!(z.value().is_sign_positive());
        assert_eq!(z.cmp(&Rate::ZERO), Ordering::Equal);
    }

    #[test]
    fn serde_rejects_invalid_rates() {
        let ok: Rate = serde_json::from_str("0.25").unwrap();
        assert_eq!(ok.value(), 0.25);
        assert!(serde_json::from_str::<Rate>("1.25").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "0.25");
    }
}

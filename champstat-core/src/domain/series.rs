//! Per-entity and per-group time series tables.

use serde::Serialize;

use super::ShapeError;

/// One numeric metric column of a [`TimeSeriesTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricColumn {
    pub name: String,
    /// One value per time index; `None` where the source recorded nothing.
    pub values: Vec<Option<f64>>,
}

impl MetricColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Convenience constructor for fully populated columns.
    pub fn dense(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }
}

/// Rows keyed by minutes elapsed, with a fixed set of metric columns.
///
/// Row order is the source order; the table never re-sorts by time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    minutes: Vec<u32>,
    metrics: Vec<MetricColumn>,
}

impl TimeSeriesTable {
    /// Build a table, checking that every column has one value per minute
    /// and that metric names are unique.
    pub fn new(minutes: Vec<u32>, metrics: Vec<MetricColumn>) -> Result<Self, ShapeError> {
        for (i, column) in metrics.iter().enumerate() {
            if column.values.len() != minutes.len() {
                return Err(ShapeError::LengthMismatch {
                    column: column.name.clone(),
                    expected: minutes.len(),
                    actual: column.values.len(),
                });
            }
            if metrics[..i].iter().any(|c| c.name == column.name) {
                return Err(ShapeError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { minutes, metrics })
    }

    /// Assemble a table whose columns are known to match `minutes` in length.
    pub(crate) fn from_parts(minutes: Vec<u32>, metrics: Vec<MetricColumn>) -> Self {
        debug_assert!(metrics.iter().all(|c| c.values.len() == minutes.len()));
        Self { minutes, metrics }
    }

    pub fn minutes(&self) -> &[u32] {
        &self.minutes
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    /// Metric names in column order.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|c| c.name.as_str())
    }

    pub fn metrics(&self) -> &[MetricColumn] {
        &self.metrics
    }

    pub fn metric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.metrics
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics.iter().any(|c| c.name == name)
    }

    /// `(minute, value)` pairs for one metric, in row order.
    pub fn points<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = (u32, Option<f64>)> + 'a> {
        let values = self.metric(name)?;
        Some(self.minutes.iter().copied().zip(values.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TimeSeriesTable {
        TimeSeriesTable::new(
            vec![1, 2, 3],
            vec![
                MetricColumn::dense("gold_earned", [500.0, 900.0, 1400.0]),
                MetricColumn::new("wards_placed", vec![Some(0.0), None, Some(1.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn exposes_metrics_in_column_order() {
        let t = table();
        let names: Vec<&str> = t.metric_names().collect();
        assert_eq!(names, vec!["gold_earned", "wards_placed"]);
        assert!(t.has_metric("wards_placed"));
        assert!(!t.has_metric("kills"));
    }

    #[test]
    fn points_pair_minutes_with_values() {
        let t = table();
        let points: Vec<_> = t.points("wards_placed").unwrap().collect();
        assert_eq!(points, vec![(1, Some(0.0)), (2, None), (3, Some(1.0))]);
        assert!(t.points("kills").is_none());
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = TimeSeriesTable::new(vec![1, 2], vec![MetricColumn::dense("xp", [1.0])])
            .unwrap_err();
        assert_eq!(
            err,
            ShapeError::LengthMismatch {
                column: "xp".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_metric_names() {
        let err = TimeSeriesTable::new(
            vec![1],
            vec![MetricColumn::dense("xp", [1.0]), MetricColumn::dense("xp", [2.0])],
        )
        .unwrap_err();
        assert_eq!(err, ShapeError::DuplicateColumn("xp".into()));
    }
}

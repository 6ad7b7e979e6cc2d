//! Series aggregation: merge selected entity and group-average time series
//! into one long-form `(minute, value, series)` table for charting.
//!
//! Contract:
//! - Entities contribute first, then groups, each in selection order.
//! - Each contributing table adds one row per source time entry, in source
//!   order. No interleaving or re-sorting by time.
//! - Tables lacking the metric, and unknown ids, are skipped without error.
//! - Duplicate ids collapse to their first occurrence.
//! - The available-metric list comes from the first known selected group,
//!   else the first known selected entity, else is empty.

use serde::{Deserialize, Serialize};

use crate::store::DataStore;

/// Suffix appended to group names to mark an averaged series.
pub const DEFAULT_GROUP_SUFFIX: &str = " (Avg)";

/// Selected entity and group ids, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSelection {
    pub entities: Vec<String>,
    pub groups: Vec<String>,
}

impl SeriesSelection {
    pub fn new<E, G>(entities: E, groups: G) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            entities: entities.into_iter().map(Into::into).collect(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.groups.is_empty()
    }
}

/// One chart point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub minute: u32,
    /// `None` where the source table recorded nothing at this minute.
    pub value: Option<f64>,
    /// Entity name, or group name plus the group suffix.
    pub series: String,
}

/// Result of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    pub metric: String,
    pub rows: Vec<SeriesRow>,
    /// Metric names the selector should offer for this selection.
    pub available_metrics: Vec<String>,
    /// Set when no contributing table has `metric`: the first available metric.
    pub suggested_metric: Option<String>,
}

impl AggregatedSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct series labels in output order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for row in &self.rows {
            if labels.last() != Some(&row.series.as_str()) {
                labels.push(&row.series);
            }
        }
        labels
    }
}

/// Label of a group-average series.
pub fn group_label(group: &str, suffix: &str) -> String {
    format!("{group}{suffix}")
}

fn dedup(ids: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id.as_str()) {
            out.push(id);
        }
    }
    out
}

/// Metric names offered for a selection.
pub fn available_metrics(store: &DataStore, selection: &SeriesSelection) -> Vec<String> {
    let first_group = selection.groups.iter().find_map(|g| store.group(g));
    let first_entity = selection.entities.iter().find_map(|e| store.entity(e));
    match first_group.or(first_entity) {
        Some(table) => table.metric_names().map(str::to_string).collect(),
        None => Vec::new(),
    }
}

/// Aggregate the selected series on one metric.
pub fn aggregate_series(
    store: &DataStore,
    selection: &SeriesSelection,
    metric: &str,
    group_suffix: &str,
) -> AggregatedSeries {
    let mut rows = Vec::new();
    let mut contributed = false;

    let entities = dedup(&selection.entities)
        .into_iter()
        .map(|id| (id, store.entity(id), id.to_string()));
    let groups = dedup(&selection.groups)
        .into_iter()
        .map(|id| (id, store.group(id), group_label(id, group_suffix)));

    for (id, table, label) in entities.chain(groups) {
        let Some(table) = table else {
            tracing::debug!(id, "unknown series id skipped");
            continue;
        };
        let Some(points) = table.points(metric) else {
            tracing::debug!(id, metric, "series lacks metric, skipped");
            continue;
        };
        contributed = true;
        rows.extend(points.map(|(minute, value)| SeriesRow {
            minute,
            value,
            series: label.clone(),
        }));
    }

    let available_metrics = available_metrics(store, selection);
    let suggested_metric = if contributed {
        None
    } else {
        available_metrics.first().cloned()
    };

    AggregatedSeries {
        metric: metric.to_string(),
        rows,
        available_metrics,
        suggested_metric,
    }
}

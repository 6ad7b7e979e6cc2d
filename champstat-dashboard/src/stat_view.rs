//! Stat tab: per-minute metric chart for selected champions and groups.

use serde::Serialize;

use champstat_core::{aggregate_series, AggregatedSeries, DataStore, SeriesSelection};

use crate::config::DashboardConfig;

pub const NO_SELECTION: &str = "Select at least one champion or group.";
pub const NO_SERIES_DATA: &str = "No data for the current selection.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatRequest {
    pub selection: SeriesSelection,
    /// Metric picked in the selector; `None` uses the configured default.
    pub metric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatView {
    /// Metric as requested, before fallback.
    pub requested_metric: String,
    /// Chart rows plus the metric options for this selection. `series.metric`
    /// is the metric actually charted.
    pub series: AggregatedSeries,
    /// Shown instead of a chart.
    pub message: Option<&'static str>,
}

impl StatView {
    /// True when the charted metric differs from the requested one.
    pub fn fell_back(&self) -> bool {
        self.series.metric != self.requested_metric
    }
}

/// Resolve the metric and aggregate: requested → configured default → first available.
pub fn stat_view(store: &DataStore, config: &DashboardConfig, request: &StatRequest) -> StatView {
    let requested = request
        .metric
        .clone()
        .unwrap_or_else(|| config.default_metric.clone());
    let aggregate = |metric: &str| {
        aggregate_series(
            store,
            &request.selection,
            metric,
            &config.group_label_suffix,
        )
    };

    let mut series = aggregate(&requested);
    if series.suggested_metric.is_some() && requested != config.default_metric {
        let fallback = aggregate(&config.default_metric);
        if fallback.suggested_metric.is_none() && !fallback.rows.is_empty() {
            series = fallback;
        }
    }
    if let Some(suggested) = series.suggested_metric.clone() {
        tracing::debug!(requested = %requested, suggested = %suggested, "metric not in selection, using suggestion");
        series = aggregate(&suggested);
    }

    let message = if request.selection.is_empty() {
        Some(NO_SELECTION)
    } else if series.rows.is_empty() {
        Some(NO_SERIES_DATA)
    } else {
        None
    };

    StatView {
        requested_metric: requested,
        series,
        message,
    }
}

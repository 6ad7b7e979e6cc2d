//! Champstat Core: data store, series aggregation, rate tables, matchup lookup.
//!
//! This crate contains everything below the dashboard views:
//! - Domain types (rates, time series tables, rate tables, matchup tables)
//! - The read-only Data Store and its Parquet loader/writer
//! - Multi-series aggregation for stat charts
//! - The filter → sort → format rate table pipeline
//! - Matchup lookup with an explicit no-data result
//! - Dataset fingerprinting and a seeded sample-data generator

pub mod aggregate;
pub mod domain;
pub mod fingerprint;
pub mod format;
pub mod matchup;
pub mod sample;
pub mod store;
pub mod table;

pub use aggregate::{aggregate_series, available_metrics, AggregatedSeries, SeriesRow, SeriesSelection};
pub use fingerprint::DatasetFingerprint;
pub use format::{format_rate, parse_percent, Cell, DEFAULT_NO_DATA};
pub use matchup::{lookup, MatchupLookup};
pub use store::{DataFiles, DataStore, FileNames, StoreError, StoreManifest, StoreSummary};
pub use table::{
    filter_rows, format_table, render, sort_rows, FormattedRow, FormattedTable, RateFilter,
    SortMode, TableError, TableQuery,
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the snapshot and everything derived from it are Send + Sync,
    /// so a presentation layer can share one store across threads by reference.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Snapshot
        require_send::<DataStore>();
        require_sync::<DataStore>();
        require_send::<domain::TimeSeriesTable>();
        require_sync::<domain::TimeSeriesTable>();
        require_send::<domain::RateTable>();
        require_sync::<domain::RateTable>();
        require_send::<domain::MatchupTable>();
        require_sync::<domain::MatchupTable>();

        // Derived views
        require_send::<AggregatedSeries>();
        require_sync::<AggregatedSeries>();
        require_send::<FormattedTable>();
        require_sync::<FormattedTable>();
        require_send::<MatchupLookup<'static>>();
        require_sync::<MatchupLookup<'static>>();

        // Errors
        require_send::<StoreError>();
        require_sync::<StoreError>();
        require_send::<TableError>();
        require_sync::<TableError>();
    }

    /// Entity rows come first, then the group average, each in time order.
    #[test]
    fn aggregation_example_labels() {
        use domain::{Keyed, MatchupTable, MetricColumn, TimeSeriesTable};

        let a = TimeSeriesTable::new(vec![1, 2], vec![MetricColumn::dense("m", [10.0, 20.0])])
            .unwrap();
        let g = TimeSeriesTable::new(vec![1], vec![MetricColumn::dense("m", [15.0])]).unwrap();
        let store = DataStore::new(
            [("A", a)].into_iter().collect(),
            [("G", g)].into_iter().collect(),
            Keyed::new(),
            MatchupTable::new(),
        );
        let out = aggregate_series(
            &store,
            &SeriesSelection::new(["A"], ["G"]),
            "m",
            aggregate::DEFAULT_GROUP_SUFFIX,
        );
        let labels: Vec<&str> = out.rows.iter().map(|r| r.series.as_str()).collect();
        assert_eq!(labels, vec!["A", "A", "G (Avg)"]);
    }
}

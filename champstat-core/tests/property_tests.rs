//! Property tests for aggregation and the rate table pipeline.
//!
//! Uses proptest to verify:
//! 1. Row count: aggregation yields exactly the rows of tables holding the metric
//! 2. Format round trip: re-formatting is stable only through re-parsing
//! 3. Sort symmetry: ascending reversed equals descending; absent rows trail both
//! 4. Filter monotonicity: a higher minimum never keeps more rows

use proptest::prelude::*;

use champstat_core::domain::{
    Keyed, MatchupTable, MetricColumn, Rate, RateRow, RateTable, TimeSeriesTable, PICK_RATE,
    WIN_RATE,
};
use champstat_core::{
    aggregate_series, filter_rows, format_rate, parse_percent, sort_rows, DataStore, RateFilter,
    SeriesSelection, SortMode, DEFAULT_NO_DATA,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_rate() -> impl Strategy<Value = Rate> {
    (0.0..=1.0_f64).prop_map(|v| Rate::new(v).unwrap())
}

fn arb_opt_rate() -> impl Strategy<Value = Option<Rate>> {
    prop_oneof![1 => Just(None), 4 => arb_rate().prop_map(Some)]
}

/// (row count, has metric "m")
fn arb_series_shape() -> impl Strategy<Value = (usize, bool)> {
    (0usize..20, any::<bool>())
}

fn make_series(len: usize, has_metric: bool) -> TimeSeriesTable {
    let minutes: Vec<u32> = (0..len as u32).collect();
    let name = if has_metric { "m" } else { "other" };
    let values = (0..len).map(|i| Some(i as f64)).collect();
    TimeSeriesTable::new(minutes, vec![MetricColumn::new(name, values)]).unwrap()
}

fn rate_table(rates: Vec<(Option<Rate>, Option<Rate>)>) -> RateTable {
    let rows = rates
        .into_iter()
        .enumerate()
        .map(|(i, (win, pick))| RateRow::new(format!("e{i}"), vec![win, pick]))
        .collect();
    RateTable::new("entity", vec![WIN_RATE.into(), PICK_RATE.into()], rows).unwrap()
}

fn column(table: &RateTable, name: &str) -> Vec<Option<Rate>> {
    table.column(name).unwrap()
}

// ── 1. Row Count ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn aggregation_row_count_matches_contributors(
        entities in prop::collection::vec(arb_series_shape(), 0..6),
        groups in prop::collection::vec(arb_series_shape(), 0..6),
    ) {
        let expected: usize = entities
            .iter()
            .chain(groups.iter())
            .filter(|(_, has)| *has)
            .map(|(len, _)| *len)
            .sum();

        let entity_tables: Keyed<TimeSeriesTable> = entities
            .iter()
            .enumerate()
            .map(|(i, (len, has))| (format!("e{i}"), make_series(*len, *has)))
            .collect();
        let group_tables: Keyed<TimeSeriesTable> = groups
            .iter()
            .enumerate()
            .map(|(i, (len, has))| (format!("g{i}"), make_series(*len, *has)))
            .collect();
        let selection = SeriesSelection::new(
            entity_tables.keys().map(str::to_string).collect::<Vec<_>>(),
            group_tables.keys().map(str::to_string).collect::<Vec<_>>(),
        );
        let store = DataStore::new(entity_tables, group_tables, Keyed::new(), MatchupTable::new());

        let out = aggregate_series(&store, &selection, "m", " (Avg)");
        prop_assert_eq!(out.rows.len(), expected);
    }
}

// ── 2. Format Round Trip ─────────────────────────────────────────────

proptest! {
    #[test]
    fn reformatting_through_parse_is_stable(rate in arb_opt_rate()) {
        let first = format_rate(rate, DEFAULT_NO_DATA);
        let parsed = parse_percent(first.as_str(), DEFAULT_NO_DATA).unwrap();
        let second = format_rate(parsed, DEFAULT_NO_DATA);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn formatted_output_never_shows_nan(rate in arb_opt_rate()) {
        let cell = format_rate(rate, DEFAULT_NO_DATA);
        prop_assert!(!cell.as_str().contains("NaN"));
        prop_assert_eq!(rate.is_none(), cell.is_no_data());
    }
}

// ── 3. Sort Symmetry ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn ascending_reversed_equals_descending(
        rates in prop::collection::vec((arb_opt_rate(), arb_opt_rate()), 0..30),
    ) {
        let table = rate_table(rates);
        let absent = column(&table, WIN_RATE).iter().filter(|r| r.is_none()).count();

        let asc = column(&sort_rows(&table, WIN_RATE, SortMode::Ascending).unwrap(), WIN_RATE);
        let desc = column(&sort_rows(&table, WIN_RATE, SortMode::Descending).unwrap(), WIN_RATE);

        let defined = asc.len() - absent;
        // Absent rows trail in both directions.
        prop_assert!(asc[defined..].iter().all(Option::is_none));
        prop_assert!(desc[defined..].iter().all(Option::is_none));

        let mut reversed: Vec<Option<Rate>> = asc[..defined].to_vec();
        reversed.reverse();
        prop_assert_eq!(reversed, desc[..defined].to_vec());
    }

    #[test]
    fn by_count_is_identity(
        rates in prop::collection::vec((arb_opt_rate(), arb_opt_rate()), 0..30),
    ) {
        let table = rate_table(rates);
        prop_assert_eq!(sort_rows(&table, PICK_RATE, SortMode::ByCount).unwrap(), table);
    }
}

// ── 4. Filter Monotonicity ───────────────────────────────────────────

proptest! {
    #[test]
    fn raising_threshold_never_adds_rows(
        rates in prop::collection::vec((arb_opt_rate(), arb_opt_rate()), 0..30),
        a in 0.0..=1.0_f64,
        b in 0.0..=1.0_f64,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let table = rate_table(rates);
        let kept_low = filter_rows(&table, &RateFilter::new(PICK_RATE, low)).unwrap();
        let kept_high = filter_rows(&table, &RateFilter::new(PICK_RATE, high)).unwrap();
        prop_assert!(kept_high.len() <= kept_low.len());
        prop_assert!(kept_low.len() <= table.len());
    }
}

// ── Worked examples ──────────────────────────────────────────────────

#[test]
fn descending_example_puts_absent_last() {
    let r = |v: f64| Some(Rate::new(v).unwrap());
    let table = rate_table(vec![(r(0.12), None), (None, None), (r(0.50), None)]);
    let sorted = sort_rows(&table, WIN_RATE, SortMode::Descending).unwrap();
    assert_eq!(column(&sorted, WIN_RATE), vec![r(0.50), r(0.12), None]);
}

#[test]
fn formatting_example() {
    assert_eq!(format_rate(Some(Rate::new(0.1234).unwrap()), DEFAULT_NO_DATA).as_str(), "12.34%");
    assert_eq!(format_rate(None, DEFAULT_NO_DATA).as_str(), "no data available");
}

//! Criterion benchmarks for the per-interaction recomputations.
//!
//! Benchmarks:
//! 1. Series aggregation over every entity and group
//! 2. Rate table render (filter → sort → format) per sort mode
//! 3. Matchup lookup plus render for every role of one entity
//! 4. Dataset fingerprint of a full sample store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use champstat_core::domain::{PICK_RATE, WIN_RATE};
use champstat_core::sample::{generate, SampleSpec};
use champstat_core::{
    aggregate_series, lookup, render, DatasetFingerprint, RateFilter, SeriesSelection, SortMode,
    TableQuery, DEFAULT_NO_DATA,
};

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_series");

    for minutes in [30u32, 60, 120] {
        let store = generate(&SampleSpec {
            minutes,
            ..SampleSpec::default()
        });
        let selection = SeriesSelection::new(
            store.entity_series().keys().map(str::to_string).collect::<Vec<_>>(),
            store.group_series().keys().map(str::to_string).collect::<Vec<_>>(),
        );
        group.bench_with_input(BenchmarkId::new("all_series", minutes), &minutes, |b, _| {
            b.iter(|| {
                aggregate_series(
                    black_box(&store),
                    black_box(&selection),
                    "damage_to_champions",
                    " (Avg)",
                )
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_win_pick");
    let store = generate(&SampleSpec::default());
    let Some(table) = store.win_pick_table("MIDDLE") else {
        return;
    };

    for mode in SortMode::ALL {
        let query = TableQuery {
            filter: Some(RateFilter::new(PICK_RATE, 0.005)),
            sort_column: WIN_RATE.into(),
            sort: mode,
            no_data: DEFAULT_NO_DATA.into(),
        };
        group.bench_function(mode.as_str(), |b| b.iter(|| render(black_box(table), &query)));
    }

    group.finish();
}

fn bench_matchups(c: &mut Criterion) {
    let store = generate(&SampleSpec::default());
    let roles: Vec<&str> = store.matchups().all_roles();
    let query = TableQuery {
        filter: None,
        sort_column: WIN_RATE.into(),
        sort: SortMode::Descending,
        no_data: DEFAULT_NO_DATA.into(),
    };

    c.bench_function("matchups_all_roles", |b| {
        b.iter(|| {
            for role in &roles {
                if let Some(table) = lookup(store.matchups(), black_box("Ahri"), role).rate_table() {
                    let _ = black_box(render(&table, &query));
                }
            }
        })
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    let store = generate(&SampleSpec::default());
    c.bench_function("fingerprint_sample_store", |b| {
        b.iter(|| DatasetFingerprint::of(black_box(&store)))
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_render,
    bench_matchups,
    bench_fingerprint,
);
criterion_main!(benches);

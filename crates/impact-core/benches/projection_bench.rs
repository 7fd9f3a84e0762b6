//! # Projection Benchmarks
//!
//! Performance benchmarks for impact-core store, search and projection.
//!
//! Run with: `cargo bench -p impact-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use impact_core::{EntityStore, Feature, FeatureId, Screen, export_dot, project, search};
use std::hint::black_box;

const FEATURES_PER_SCREEN: usize = 8;

/// Create a store with N screens, each feature connected to the next one.
fn create_chained_store(screens: usize) -> (EntityStore, Vec<FeatureId>) {
    let mut store = EntityStore::new();
    let mut ids = Vec::with_capacity(screens * FEATURES_PER_SCREEN);

    for s in 0..screens {
        let features: Vec<Feature> = (0..FEATURES_PER_SCREEN)
            .map(|f| Feature::new(format!("Feature {s}-{f}"), format!("Part of screen {s}")))
            .collect();
        ids.extend(features.iter().map(|f| f.id));
        store.add_screen(Screen::new(format!("Screen {s}"), features));
    }

    for pair in ids.windows(2) {
        store.add_connection(pair[0], pair[1]);
    }

    (store, ids)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_add_screen(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_screen");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_chained_store(size)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [10, 100, 1000].iter() {
        let (store, _) = create_chained_store(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(search("feature 1", store.current())));
        });
    }

    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");

    for size in [10, 100, 1000].iter() {
        let (store, ids) = create_chained_store(*size);
        let selected = ids.first().copied();
        let outcome = search("screen 1", store.current());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                black_box(project(
                    store.current(),
                    selected,
                    &outcome.results,
                    &outcome.matched_term,
                ))
            });
        });
    }

    group.finish();
}

fn bench_export_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_dot");

    for size in [10, 100, 500].iter() {
        let (store, _) = create_chained_store(*size);
        let projection = project(store.current(), None, &[], "");

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(export_dot(&projection)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add_screen,
    bench_search,
    bench_project,
    bench_export_dot,
);

criterion_main!(benches);

//! Benchmarks for the pure chart functions: generation, aspect detection and
//! compatibility scoring.

use std::hint::black_box;

use astrosonic::{aspects, compute_compatibility, generate, Genre};
use criterion::Criterion;

use super::sample_chart;

pub fn bench_sonify(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/sonify");
    let chart = sample_chart(0.0);
    let partner = sample_chart(37.0);

    group.bench_function("generate", |b| {
        b.iter(|| generate(black_box(&chart), Genre::Ambient))
    });
    group.bench_function("detect_aspects", |b| {
        b.iter(|| aspects::detect(black_box(&chart)))
    });
    group.bench_function("compatibility", |b| {
        b.iter(|| compute_compatibility(black_box(&chart), black_box(&partner)))
    });

    group.finish();
}

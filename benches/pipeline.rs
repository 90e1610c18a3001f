//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pendulograph::integrator::{rk4_step, PendulumState};
use pendulograph::interpolate::interpolate;
use pendulograph::prelude::*;
use pendulograph::{animate_frame, Frame, Vector};

fn bench_rk4(c: &mut Criterion) {
    let state = PendulumState::from_radius(600.0, 20000.0);

    c.bench_function("rk4_step", |b| {
        b.iter(|| black_box(rk4_step(black_box(state), 0.01, 9.8, 20000.0)))
    });
}

fn bench_interpolate(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate");
    let points: Vec<Vector> = [(0.0, 0.0), (1.0, 2.0), (3.0, 1.0), (4.0, 4.0)]
        .into_iter()
        .map(|(x, y)| Vector::new(vec![x, y]))
        .collect();

    for density in [5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(density), &density, |b, &d| {
            b.iter(|| black_box(interpolate(&points, d).unwrap()))
        });
    }

    group.finish();
}

fn bench_animate_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("animate_frame");

    for tracks in [1, 3, 10] {
        let config = SimulationConfig {
            num_colors: tracks,
            ..Default::default()
        };
        let env = config.environment().unwrap();
        let frame = Frame::initial(&env);

        group.bench_with_input(BenchmarkId::new("recording", tracks), &tracks, |b, _| {
            b.iter(|| {
                let mut surface = RecordingSurface::new();
                black_box(animate_frame(frame, &env, &mut surface).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rk4, bench_interpolate, bench_animate_frame);
criterion_main!(benches);

#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use rand::prelude::*;
use rand_distr::StandardNormal;
use spectral_grid::radial::{radial_profile, radial_profile_square};
use spectral_grid::{EvalOptions, Float, Grid, PeriodicWrap, SpectralGridField, PI};

fn random_grid(n: usize) -> Grid<Float> {
    let mut rng = StdRng::seed_from_u64(42);
    let data = (0..n * n)
        .map(|_| rng.sample::<Float, _>(StandardNormal))
        .collect();
    Grid::new(n, n, data).unwrap()
}

fn sine_wrap() -> PeriodicWrap {
    let mut points = Vec::new();
    let mut values = Vec::new();
    for i in 0..20 {
        for j in 0..20 {
            let (x, y) = (i as Float / 19.0, j as Float / 19.0);
            points.push(x);
            points.push(y);
            values.push((2.0 * PI * x).sin() * (2.0 * PI * y).sin());
        }
    }
    PeriodicWrap::new(points, values, vec![1.0, 1.0]).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let spectral = SpectralGridField::new(random_grid(128), 1.0).unwrap();
    c.bench_function("gaussian smoothing 128", |b| {
        b.iter(|| spectral.gaussian_smoothed(black_box(2.0)))
    });

    let grid = random_grid(128);
    c.bench_function("radial profile 128", |b| {
        b.iter(|| radial_profile(black_box(&grid), [128.0, 128.0]))
    });
    c.bench_function("square radial profile 128", |b| {
        b.iter(|| radial_profile_square(black_box(&grid), 128.0))
    });

    let wrap = sine_wrap();
    let queries: Vec<Float> = (0..2000).map(|i| (i as Float * 0.377).sin() * 3.0).collect();
    let opts = EvalOptions::default();
    c.bench_function("periodic evaluate 1000", |b| {
        b.iter(|| wrap.evaluate(black_box(&queries), &opts))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

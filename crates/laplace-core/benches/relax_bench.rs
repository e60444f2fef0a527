use criterion::{criterion_group, criterion_main, Criterion};
use laplace_core::relax::{commit_sweep, jacobi_sweep};
use laplace_core::solver::solve;
use laplace_types::config::SolverSettings;
use laplace_types::scheme::Scheme;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn noisy_grid(rows: usize, cols: usize) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(0x1a9);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1.0f32..1.0))
}

fn bench_sweep_130(c: &mut Criterion) {
    let cells = noisy_grid(130, 130);
    let mut next = cells.clone();

    c.bench_function("jacobi_sweep_128x128", |b| {
        b.iter(|| black_box(jacobi_sweep(&cells, &mut next)))
    });
}

fn bench_sweep_514(c: &mut Criterion) {
    let cells = noisy_grid(514, 514);
    let mut next = cells.clone();

    c.bench_function("jacobi_sweep_512x512", |b| {
        b.iter(|| black_box(jacobi_sweep(&cells, &mut next)))
    });
}

fn bench_sweep_commit_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_commit_258x258");
    group.sample_size(20);

    group.bench_function("200_sweeps", |b| {
        b.iter(|| {
            let mut cells = noisy_grid(258, 258);
            let mut next = cells.clone();
            for _ in 0..200 {
                jacobi_sweep(&cells, &mut next);
                commit_sweep(&mut cells, &next);
            }
            black_box(cells[[129, 129]]);
        })
    });

    group.finish();
}

fn bench_full_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_64x64");
    group.sample_size(10);

    for nranks in [1usize, 4] {
        let mut settings = SolverSettings::new(64, nranks, Scheme::Strip);
        settings.precision = 1.0e-2;
        group.bench_function(format!("strip_{nranks}_ranks"), |b| {
            b.iter(|| {
                let report = solve(&settings).unwrap();
                black_box(report.iterations);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sweep_130,
    bench_sweep_514,
    bench_sweep_commit_cycle,
    bench_full_solve
);
criterion_main!(benches);

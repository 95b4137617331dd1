//! Criterion benchmarks for whole driver runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tremor_bench::impact_profile;
use tremor_core::Communicator;
use tremor_model::Factories;

fn bench_run(c: &mut Criterion, name: &str, n: usize, steps: u64) {
    let params = impact_profile(n, steps);
    let comm = Communicator::serial();
    let factories = Factories::new();
    c.bench_function(name, |b| {
        b.iter(|| {
            let report = tremor_engine::run(&comm, &params, &factories).unwrap();
            black_box(&report);
        });
    });
}

fn bench_10_steps_8(c: &mut Criterion) {
    bench_run(c, "10_steps_tet4_8", 8, 10);
}

fn bench_100_steps_8(c: &mut Criterion) {
    bench_run(c, "100_steps_tet4_8", 8, 100);
}

fn bench_10_steps_16(c: &mut Criterion) {
    bench_run(c, "10_steps_tet4_16", 16, 10);
}

criterion_group!(benches, bench_10_steps_8, bench_100_steps_8, bench_10_steps_16);
criterion_main!(benches);

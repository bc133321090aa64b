use criterion::{criterion_group, criterion_main, Criterion};
use readout_core::rng::RngHandle;
use readout_mag::{random_histogram, sharded_magnetization, total_magnetization, CountsHistogram};

fn sample_histogram() -> CountsHistogram {
    let mut rng = RngHandle::from_seed(42);
    random_histogram(16, 65_536, 200, &mut rng).unwrap()
}

fn bench_magnetization(c: &mut Criterion) {
    let histogram = sample_histogram();

    c.bench_function("total_magnetization", |b| {
        b.iter(|| total_magnetization(&histogram))
    });
    c.bench_function("sharded_magnetization", |b| {
        b.iter(|| sharded_magnetization(&histogram))
    });
}

criterion_group!(benches, bench_magnetization);
criterion_main!(benches);

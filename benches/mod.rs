use criterion::{criterion_group, criterion_main};

mod enrollment;

use enrollment::register_benchmarks as register_enrollment_benchmarks;
use snapshot::register_benchmarks as register_snapshot_benchmarks;

// Define the benchmark groups
criterion_group!(
    benches,
    register_enrollment_benchmarks,
    register_snapshot_benchmarks,
);

criterion_main!(benches);

use criterion::Criterion;

mod enroll;
mod promotion;

/// Register all enrollment benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    enroll::register_benchmarks(c);
    promotion::register_benchmarks(c);
}

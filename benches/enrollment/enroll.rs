use criterion::{BenchmarkId, Criterion};
use std::hint::black_box;
use study_enrollment::{
    AccountId, DefaultEnrollmentEngine, EnrollmentType, Event, InMemoryEnrollmentStore,
};

/// Register enroll and disenroll benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Enrollment - Enroll");

    // Fill an FCFS event whose waitlist grows past the limit
    for &count in &[100usize, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("enroll_fcfs", count),
            &count,
            |b, &count| {
                b.iter_with_setup(
                    || {
                        let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
                        let event = Event::new("BENCH", EnrollmentType::Fcfs, (count / 2) as u32)
                            .expect("valid event");
                        let accounts: Vec<_> = (0..count).map(|_| AccountId::new()).collect();
                        (engine, event, accounts)
                    },
                    |(engine, event, accounts)| {
                        for account in accounts {
                            let _ = black_box(engine.enroll(&event, account));
                        }
                    },
                );
            },
        );
    }

    // Disenroll waiting members, which never promotes
    for &count in &[100usize, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("disenroll_waiting", count),
            &count,
            |b, &count| {
                b.iter_with_setup(
                    || {
                        let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
                        let event =
                            Event::new("BENCH", EnrollmentType::Fcfs, 1).expect("valid event");
                        let accounts: Vec<_> = (0..count).map(|_| AccountId::new()).collect();
                        for account in &accounts {
                            let _ = engine.enroll(&event, *account);
                        }
                        (engine, event, accounts)
                    },
                    |(engine, event, accounts)| {
                        for account in accounts.iter().skip(1) {
                            let _ = black_box(engine.disenroll(&event, *account));
                        }
                    },
                );
            },
        );
    }

    group.finish();
}

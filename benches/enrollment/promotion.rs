use criterion::{BenchmarkId, Criterion};
use std::hint::black_box;
use study_enrollment::{
    AccountId, DefaultEnrollmentEngine, EnrollmentType, Event, InMemoryEnrollmentStore,
};

fn full_event(limit: u32, waiting: usize) -> (DefaultEnrollmentEngine, Event, Vec<AccountId>) {
    let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
    let event = Event::new("BENCH", EnrollmentType::Fcfs, limit).expect("valid event");
    let accounts: Vec<_> = (0..limit as usize + waiting)
        .map(|_| AccountId::new())
        .collect();
    for account in &accounts {
        let _ = engine.enroll(&event, *account);
    }
    (engine, event, accounts)
}

/// Register waitlist promotion benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Enrollment - Promotion");

    // Every disenroll of an accepted member promotes the head of the waitlist
    for &waiting in &[10usize, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("disenroll_accepted_promotes", waiting),
            &waiting,
            |b, &waiting| {
                b.iter_with_setup(
                    || full_event(10, waiting),
                    |(engine, event, accounts)| {
                        for account in accounts.iter().take(10) {
                            let outcome = black_box(engine.disenroll(&event, *account));
                            assert!(matches!(outcome, Ok(ref o) if o.promoted.is_some()));
                        }
                    },
                );
            },
        );
    }

    // Raising the limit promotes many waiters in one unit of work
    for &waiting in &[100usize, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("update_limit_promotes", waiting),
            &waiting,
            |b, &waiting| {
                b.iter_with_setup(
                    || full_event(10, waiting),
                    |(engine, mut event, _)| {
                        let promoted =
                            black_box(engine.update_limit(&mut event, 10 + waiting as u32));
                        assert!(matches!(promoted, Ok(ref p) if p.len() == waiting));
                    },
                );
            },
        );
    }

    group.finish();
}

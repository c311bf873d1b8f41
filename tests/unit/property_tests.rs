//! Property tests over random enroll/disenroll sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use study_enrollment::{
    AccountId, DefaultEnrollmentEngine, EnrollmentError, EnrollmentType, Event,
    InMemoryEnrollmentStore,
};

#[derive(Debug, Clone, Copy)]
enum Op {
    Enroll(u8),
    Disenroll(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8).prop_map(Op::Enroll),
        (0u8..8).prop_map(Op::Disenroll),
    ]
}

fn account(index: u8) -> AccountId {
    AccountId::from_name(&format!("account-{index}"))
}

fn accepted_set(engine: &DefaultEnrollmentEngine, event: &Event) -> HashSet<AccountId> {
    engine
        .enrollments(event.id())
        .expect("enrollments")
        .into_iter()
        .filter(|e| e.accepted)
        .map(|e| e.account_id)
        .collect()
}

proptest! {
    #[test]
    fn fcfs_accepted_set_is_earliest_prefix(
        limit in 1u32..5,
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
        let event = Event::new("prop", EnrollmentType::Fcfs, limit).expect("event");
        let mut enrolled: HashSet<u8> = HashSet::new();

        for op in ops {
            match op {
                Op::Enroll(index) => {
                    let result = engine.enroll(&event, account(index));
                    if enrolled.insert(index) {
                        prop_assert!(result.is_ok());
                    } else {
                        let already = matches!(result, Err(EnrollmentError::AlreadyEnrolled { .. }));
                        prop_assert!(already);
                    }
                }
                Op::Disenroll(index) => {
                    let before = accepted_set(&engine, &event);
                    let result = engine.disenroll(&event, account(index));
                    if enrolled.remove(&index) {
                        let outcome = result.expect("disenroll");
                        if !outcome.removed.accepted {
                            prop_assert!(outcome.promoted.is_none());
                            prop_assert_eq!(accepted_set(&engine, &event), before);
                        }
                    } else {
                        let not_enrolled = matches!(result, Err(EnrollmentError::NotEnrolled { .. }));
                        prop_assert!(not_enrolled);
                    }
                }
            }

            let enrollments = engine.enrollments(event.id()).expect("enrollments");
            let accepted = enrollments.iter().filter(|e| e.accepted).count();
            let expected = enrollments.len().min(limit as usize);

            prop_assert!(accepted <= limit as usize);
            prop_assert_eq!(accepted, expected);
            prop_assert!(enrollments.iter().take(expected).all(|e| e.accepted));
            prop_assert_eq!(enrollments.len(), enrolled.len());
        }
    }

    #[test]
    fn confirmative_enrollments_always_wait(
        limit in 1u32..5,
        accounts in prop::collection::hash_set(0u8..32, 1..20),
    ) {
        let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
        let event = Event::new("prop", EnrollmentType::Confirmative, limit).expect("event");

        for index in accounts {
            let enrollment = engine.enroll(&event, account(index)).expect("enroll");
            prop_assert!(!enrollment.accepted);
        }
        prop_assert_eq!(engine.accepted_count(event.id()).expect("count"), 0);
    }

    #[test]
    fn waitlist_promotes_in_fifo_order(limit in 1u32..4, waiters in 1usize..6) {
        let engine = DefaultEnrollmentEngine::new(InMemoryEnrollmentStore::new());
        let event = Event::new("prop", EnrollmentType::Fcfs, limit).expect("event");

        let holders: Vec<_> = (0..limit as u8).map(account).collect();
        let queue: Vec<_> = (0..waiters as u8).map(|i| account(100 + i)).collect();
        for id in holders.iter().chain(queue.iter()) {
            engine.enroll(&event, *id).expect("enroll");
        }

        let mut promoted = Vec::new();
        for id in &holders {
            if let Some(next) = engine.disenroll(&event, *id).expect("disenroll").promoted {
                promoted.push(next.account_id);
            }
        }

        let expected: Vec<_> = queue.iter().take(limit as usize).copied().collect();
        prop_assert_eq!(promoted, expected);
    }
}

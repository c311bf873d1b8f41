//! # Study Event Enrollment Engine
//!
//! A storage-agnostic enrollment engine for study-group meetups. Accounts enroll in events;
//! the engine decides who holds a spot, keeps first-come-first-served waitlists in order, and
//! promotes the next waiting account whenever a spot frees up.
//!
//! ## Key Features
//!
//! - **Two enrollment types**: `FCFS` events accept automatically up to their capacity and
//!   queue everybody else; `CONFIRMATIVE` events keep every enrollment waiting until a study
//!   manager accepts it.
//!
//! - **FIFO promotion**: when an accepted account leaves an FCFS event, or the capacity grows,
//!   the waiting enrollment with the earliest `enrolled_at` is accepted. Removing a waiting
//!   enrollment never changes who is accepted.
//!
//! - **Atomic, per-event units of work**: every engine call runs inside one
//!   [`EnrollmentStore::transact`] scope. Creation, deletion and promotion commit together or
//!   not at all, and operations on the same event are serialized while different events run
//!   in parallel.
//!
//! - **Pluggable storage**: the engine only speaks the [`EnrollmentUnitOfWork`] query contract.
//!   [`InMemoryEnrollmentStore`] is the reference backend.
//!
//! - **Post-commit notices**: committed changes are reported through an
//!   [`EnrollmentListener`]; [`EventManagerStd`] and [`EventManagerTokio`] route them to a
//!   single processor over std or Tokio channels.
//!
//! - **Snapshots**: checksummed JSON packages of an event's enrollments for backup and restore.
//!
//! ## Invariants
//!
//! After every engine operation on an FCFS event:
//!
//! 1. The number of accepted enrollments never exceeds `limit_of_enrollments`.
//! 2. Each account holds at most one enrollment per event.
//! 3. Promotion always picks the earliest waiting enrollment.
//!
//! ## Example
//!
//! ```
//! use study_enrollment::prelude::*;
//!
//! let engine = EnrollmentEngine::new(InMemoryEnrollmentStore::new());
//! let event = Event::new("rust-study", EnrollmentType::Fcfs, 2).unwrap();
//!
//! let may = AccountId::from_name("may");
//! let june = AccountId::from_name("june");
//! let admin = AccountId::from_name("admin");
//!
//! assert!(engine.enroll(&event, may).unwrap().accepted);
//! assert!(engine.enroll(&event, june).unwrap().accepted);
//! assert!(!engine.enroll(&event, admin).unwrap().accepted);
//!
//! let outcome = engine.disenroll(&event, may).unwrap();
//! assert_eq!(outcome.promoted.map(|e| e.account_id), Some(admin));
//! ```
//!
//! ## Feature Flags
//!
//! - `metrics`: counts enrollments, disenrollments and promotions through the `metrics` facade.

pub mod enrollment;

pub mod prelude;
mod utils;

pub use enrollment::{
    AccountId, DisenrollOutcome, ENROLLMENT_SNAPSHOT_FORMAT_VERSION, Enrollment, EnrollmentClock,
    EnrollmentEngine, EnrollmentError, EnrollmentId, EnrollmentListener, EnrollmentNotice,
    EnrollmentSnapshotPackage, EnrollmentStatus, EnrollmentStore, EnrollmentType,
    EnrollmentUnitOfWork, Event, EventEnrollmentSnapshot, EventId, EventManager, EventManagerStd,
    EventManagerTokio, InMemoryEnrollmentStore, NoticeKind, StoreError,
};
pub use utils::current_time_millis;

/// Engine over the in-memory reference store, the most common setup.
pub type DefaultEnrollmentEngine = EnrollmentEngine<InMemoryEnrollmentStore>;

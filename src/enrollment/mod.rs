//! Event enrollment engine: FCFS waitlists, confirmative events and their store.

/// Strictly increasing enrollment timestamps.
pub mod clock;
pub mod engine;
pub mod error;
/// Event definition: capacity, enrollment type and schedule.
pub mod event;
/// Multi-event management with centralized notice routing.
pub mod manager;
/// Post-commit notifications for enrollment changes.
pub mod notice;
pub mod record;
pub mod snapshot;
/// Storage contract and in-memory backend.
pub mod store;
pub mod types;

pub use clock::EnrollmentClock;
pub use engine::{DisenrollOutcome, EnrollmentEngine};
pub use error::EnrollmentError;
pub use event::Event;
pub use manager::{EventManager, EventManagerStd, EventManagerTokio};
pub use notice::{EnrollmentListener, EnrollmentNotice, NoticeKind};
pub use record::{Enrollment, EnrollmentStatus};
pub use snapshot::{
    ENROLLMENT_SNAPSHOT_FORMAT_VERSION, EnrollmentSnapshotPackage, EventEnrollmentSnapshot,
};
pub use store::{EnrollmentStore, EnrollmentUnitOfWork, InMemoryEnrollmentStore, StoreError};
pub use types::{AccountId, EnrollmentId, EnrollmentType, EventId};

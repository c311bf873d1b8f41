//! Store contract used by the enrollment engine.
//!
//! The engine never touches records directly. Each engine call opens one
//! [`EnrollmentStore::transact`] scope for a single event and issues the
//! queries below against the [`EnrollmentUnitOfWork`] it receives. Every
//! change made through the unit of work becomes visible together when the
//! closure returns `Ok`, and is discarded when it returns `Err`.

use super::error::StoreError;
use crate::enrollment::error::EnrollmentError;
use crate::enrollment::record::Enrollment;
use crate::enrollment::types::{AccountId, EnrollmentId, EventId};

/// Queries and updates available inside one atomic, event-scoped unit of work.
///
/// All operations implicitly target the event the unit of work was opened for.
pub trait EnrollmentUnitOfWork {
    /// The event this unit of work is scoped to.
    fn event_id(&self) -> EventId;

    /// Returns `true` if `account_id` holds an enrollment for the event.
    fn exists_enrollment(&self, account_id: AccountId) -> Result<bool, StoreError>;

    /// Looks up the enrollment of `account_id`.
    fn find_enrollment(&self, account_id: AccountId) -> Result<Option<Enrollment>, StoreError>;

    /// Looks up an enrollment by identifier.
    fn find_by_id(&self, enrollment_id: EnrollmentId) -> Result<Option<Enrollment>, StoreError>;

    /// Number of accepted enrollments.
    fn count_accepted(&self) -> Result<u32, StoreError>;

    /// Inserts a new enrollment and returns its identifier.
    fn insert_enrollment(
        &mut self,
        account_id: AccountId,
        enrolled_at: u64,
        accepted: bool,
    ) -> Result<EnrollmentId, StoreError>;

    /// Deletes the enrollment of `account_id`, returning the removed record.
    fn delete_enrollment(&mut self, account_id: AccountId)
    -> Result<Option<Enrollment>, StoreError>;

    /// The waiting enrollment with the earliest `enrolled_at`, if any.
    fn find_earliest_waiting(&self) -> Result<Option<Enrollment>, StoreError>;

    /// Sets the acceptance flag of an enrollment.
    ///
    /// # Errors
    /// Returns [`StoreError::EnrollmentMissing`] if the record does not exist.
    fn set_accepted(&mut self, enrollment_id: EnrollmentId, accepted: bool)
    -> Result<(), StoreError>;

    /// Sets the attendance flag of an enrollment.
    ///
    /// # Errors
    /// Returns [`StoreError::EnrollmentMissing`] if the record does not exist.
    fn set_attended(&mut self, enrollment_id: EnrollmentId, attended: bool)
    -> Result<(), StoreError>;

    /// All enrollments of the event, ordered by `enrolled_at`.
    fn enrollments(&self) -> Result<Vec<Enrollment>, StoreError>;

    /// Replaces every enrollment of the event with `records`, keeping their
    /// identifiers. Used to restore snapshots.
    fn replace_all(&mut self, records: Vec<Enrollment>) -> Result<(), StoreError>;
}

/// Durable home of enrollment records.
///
/// Implementations must run each `transact` call as a single atomic unit
/// serialized per event: two units of work for the same event never
/// interleave, units for different events may run in parallel.
pub trait EnrollmentStore: Send + Sync {
    /// Runs `work` atomically against the enrollments of `event_id`.
    ///
    /// Changes are committed only if `work` returns `Ok`. Store failures are
    /// reported as [`EnrollmentError::Store`] and also roll back.
    fn transact<R, F>(&self, event_id: EventId, work: F) -> Result<R, EnrollmentError>
    where
        F: FnOnce(&mut dyn EnrollmentUnitOfWork) -> Result<R, EnrollmentError>;

    /// Deletes every enrollment of `event_id` and returns how many were removed.
    fn remove_event(&self, event_id: EventId) -> Result<usize, StoreError>;
}

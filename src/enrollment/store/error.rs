//! Error types for enrollment store backends.

use crate::enrollment::types::EnrollmentId;
use thiserror::Error;

/// Failures raised by an [`EnrollmentStore`](super::EnrollmentStore) backend.
///
/// Store errors are transient from the engine's point of view: the unit of
/// work that observed one is rolled back and the error is surfaced to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("enrollment store unavailable: {message}")]
    Unavailable {
        /// Backend-specific description.
        message: String,
    },

    /// A per-event lock was poisoned by a panicking unit of work.
    #[error("enrollment store lock poisoned")]
    LockPoisoned,

    /// An update referenced a record that is not part of the event.
    #[error("enrollment {0} does not exist in this event")]
    EnrollmentMissing(EnrollmentId),
}

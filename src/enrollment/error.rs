//! Enrollment engine error types

use super::store::StoreError;
use super::types::{AccountId, EnrollmentId, EventId};
use std::fmt;

/// Errors that can occur within the enrollment engine
#[derive(Debug)]
#[non_exhaustive]
pub enum EnrollmentError {
    /// The account already holds an enrollment for the event
    AlreadyEnrolled {
        /// Event the enrollment belongs to
        event_id: EventId,
        /// Account that tried to enroll twice
        account_id: AccountId,
    },

    /// The account has no enrollment for the event
    NotEnrolled {
        /// Event that was targeted
        event_id: EventId,
        /// Account without an enrollment
        account_id: AccountId,
    },

    /// The enrollment window of the event has closed
    EventClosed {
        /// Event that refused the enrollment
        event_id: EventId,
        /// End of the enrollment window (milliseconds since epoch)
        end_enrollment_at: u64,
    },

    /// Event not known to the caller
    EventNotFound(EventId),

    /// Enrollment not found in the event
    EnrollmentNotFound(EnrollmentId),

    /// The requested capacity is zero or below the accepted count
    InvalidLimit {
        /// Capacity that was requested
        requested: u32,
        /// Number of enrollments already accepted
        accepted: u32,
    },

    /// Event dates are inconsistent
    InvalidSchedule {
        /// Description of the problem
        message: String,
    },

    /// Operation not permitted for this event or enrollment
    InvalidOperation {
        /// Description of the error
        message: String,
    },

    /// A manual acceptance found no remaining spot
    EventFull {
        /// Event that is full
        event_id: EventId,
        /// Capacity of the event
        limit: u32,
    },

    /// Error from the enrollment store; the unit of work was rolled back
    Store(StoreError),

    /// Error while serializing snapshot data
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing snapshot data
    DeserializationError {
        /// Underlying error message
        message: String,
    },

    /// Snapshot integrity check failed
    ChecksumMismatch {
        /// Expected checksum value
        expected: String,
        /// Actual checksum value
        actual: String,
    },
}

impl fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentError::AlreadyEnrolled {
                event_id,
                account_id,
            } => {
                write!(
                    f,
                    "Account {account_id} is already enrolled in event {event_id}"
                )
            }
            EnrollmentError::NotEnrolled {
                event_id,
                account_id,
            } => {
                write!(f, "Account {account_id} is not enrolled in event {event_id}")
            }
            EnrollmentError::EventClosed {
                event_id,
                end_enrollment_at,
            } => {
                write!(
                    f,
                    "Enrollment for event {event_id} closed at {end_enrollment_at}"
                )
            }
            EnrollmentError::EventNotFound(id) => write!(f, "Event not found: {id}"),
            EnrollmentError::EnrollmentNotFound(id) => write!(f, "Enrollment not found: {id}"),
            EnrollmentError::InvalidLimit {
                requested,
                accepted,
            } => {
                write!(
                    f,
                    "Invalid limit of enrollments: requested {requested}, already accepted {accepted}"
                )
            }
            EnrollmentError::InvalidSchedule { message } => {
                write!(f, "Invalid event schedule: {message}")
            }
            EnrollmentError::InvalidOperation { message } => {
                write!(f, "Invalid operation: {message}")
            }
            EnrollmentError::EventFull { event_id, limit } => {
                write!(f, "Event {event_id} is full ({limit} accepted)")
            }
            EnrollmentError::Store(err) => write!(f, "Store error: {err}"),
            EnrollmentError::SerializationError { message } => {
                write!(f, "Serialization error: {message}")
            }
            EnrollmentError::DeserializationError { message } => {
                write!(f, "Deserialization error: {message}")
            }
            EnrollmentError::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "Checksum mismatch: expected {expected}, but computed {actual}"
                )
            }
        }
    }
}

impl std::error::Error for EnrollmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnrollmentError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EnrollmentError {
    #[cold]
    fn from(err: StoreError) -> Self {
        EnrollmentError::Store(err)
    }
}

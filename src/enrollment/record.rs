//! The enrollment record: one account's place in one event.

use super::types::{AccountId, EnrollmentId, EventId};
use serde::{Deserialize, Serialize};

/// Acceptance state of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    /// On the waitlist (FCFS) or awaiting a manager decision (confirmative).
    Waiting,
    /// Holds one of the event's spots.
    Accepted,
}

/// A single (event, account) enrollment.
///
/// Records are created by `enroll` and deleted by `disenroll`; re-enrolling
/// creates a new record with a later `enrolled_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Store-assigned identifier
    pub id: EnrollmentId,
    /// Owning event
    pub event_id: EventId,
    /// Enrolled account
    pub account_id: AccountId,
    /// Milliseconds since epoch; strictly increasing per insertion
    pub enrolled_at: u64,
    /// Whether the enrollment holds a spot
    pub accepted: bool,
    /// Whether the account checked in at the event
    pub attended: bool,
}

impl Enrollment {
    /// Creates a record that has not checked in.
    pub fn new(
        id: EnrollmentId,
        event_id: EventId,
        account_id: AccountId,
        enrolled_at: u64,
        accepted: bool,
    ) -> Self {
        Self {
            id,
            event_id,
            account_id,
            enrolled_at,
            accepted,
            attended: false,
        }
    }

    /// Returns `true` while the enrollment is not accepted.
    #[must_use]
    #[inline]
    pub fn is_waiting(&self) -> bool {
        !self.accepted
    }

    /// Current acceptance state.
    #[must_use]
    pub fn status(&self) -> EnrollmentStatus {
        if self.accepted {
            EnrollmentStatus::Accepted
        } else {
            EnrollmentStatus::Waiting
        }
    }
}

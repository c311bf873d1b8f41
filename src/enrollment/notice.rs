/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/
use super::record::Enrollment;
use super::types::{AccountId, EnrollmentId, EventId};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What happened to an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// A new enrollment was created, accepted or waiting.
    Enrolled {
        /// Whether it was admitted immediately
        accepted: bool,
    },
    /// The enrollment was deleted by its account.
    Disenrolled {
        /// Whether it held a spot before removal
        was_accepted: bool,
    },
    /// A waiting enrollment moved into a freed or added spot.
    Promoted,
    /// A manager accepted a confirmative enrollment.
    Accepted,
    /// A manager rejected a confirmative enrollment.
    Rejected,
    /// The account checked in at the event.
    CheckedIn,
    /// A check-in was reverted.
    CheckInCancelled,
}

/// Notification emitted after an enrollment change has been committed.
///
/// Notices are never emitted for rolled-back units of work. Listeners
/// typically forward them to mail or push delivery, which is outside
/// this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentNotice {
    /// Event the enrollment belongs to
    pub event_id: EventId,
    /// Account concerned by the change
    pub account_id: AccountId,
    /// Enrollment concerned by the change
    pub enrollment_id: EnrollmentId,
    /// The change itself
    pub kind: NoticeKind,
    /// Unix timestamp in milliseconds when the notice was created
    pub timestamp: u64,
}

impl EnrollmentNotice {
    /// Build a notice for `enrollment`, stamped with the current time.
    pub fn new(enrollment: &Enrollment, kind: NoticeKind) -> Self {
        Self {
            event_id: enrollment.event_id,
            account_id: enrollment.account_id,
            enrollment_id: enrollment.id,
            kind,
            timestamp: current_time_millis(),
        }
    }
}

/// Listener for committed enrollment changes, using Arc for shared ownership
pub type EnrollmentListener = Arc<dyn Fn(&EnrollmentNotice) + Send + Sync>;

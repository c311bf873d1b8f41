//! Event definition: capacity, enrollment type and schedule.

use super::error::EnrollmentError;
use super::types::{EnrollmentType, EventId};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};

/// One day in milliseconds, the default length of the enrollment window.
const DEFAULT_ENROLLMENT_WINDOW_MS: u64 = 24 * 60 * 60 * 1_000;

/// A meetup event that accounts enroll in.
///
/// The enrollment type is fixed at creation. The capacity counts *accepted*
/// enrollments only and can be changed through the engine's `update_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub(crate) id: EventId,
    pub(crate) title: String,
    pub(crate) enrollment_type: EnrollmentType,
    pub(crate) limit_of_enrollments: u32,
    pub(crate) created_at: u64,
    pub(crate) end_enrollment_at: u64,
    pub(crate) start_at: u64,
    pub(crate) end_at: u64,
}

impl Event {
    /// Create an event whose enrollment window closes one day from now.
    ///
    /// The event starts when enrollment closes and lasts two hours.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::InvalidLimit`] when `limit_of_enrollments` is zero.
    pub fn new(
        title: &str,
        enrollment_type: EnrollmentType,
        limit_of_enrollments: u32,
    ) -> Result<Self, EnrollmentError> {
        let now = current_time_millis();
        let end_enrollment_at = now.saturating_add(DEFAULT_ENROLLMENT_WINDOW_MS);
        Self::with_schedule(
            title,
            enrollment_type,
            limit_of_enrollments,
            end_enrollment_at,
            end_enrollment_at,
            end_enrollment_at.saturating_add(2 * 60 * 60 * 1_000),
        )
    }

    /// Create an event with an explicit schedule.
    ///
    /// # Arguments
    /// * `end_enrollment_at` - enrollment is refused from this instant on
    /// * `start_at` / `end_at` - when the meetup takes place
    ///
    /// # Errors
    /// Returns [`EnrollmentError::InvalidLimit`] for a zero capacity and
    /// [`EnrollmentError::InvalidSchedule`] when the dates are inconsistent.
    pub fn with_schedule(
        title: &str,
        enrollment_type: EnrollmentType,
        limit_of_enrollments: u32,
        end_enrollment_at: u64,
        start_at: u64,
        end_at: u64,
    ) -> Result<Self, EnrollmentError> {
        let event = Self {
            id: EventId::new(),
            title: title.to_string(),
            enrollment_type,
            limit_of_enrollments,
            created_at: current_time_millis(),
            end_enrollment_at,
            start_at,
            end_at,
        };
        event.validate()?;
        Ok(event)
    }

    /// Check capacity and schedule consistency.
    pub fn validate(&self) -> Result<(), EnrollmentError> {
        if self.limit_of_enrollments == 0 {
            return Err(EnrollmentError::InvalidLimit {
                requested: 0,
                accepted: 0,
            });
        }
        if self.end_enrollment_at > self.start_at {
            return Err(EnrollmentError::InvalidSchedule {
                message: format!(
                    "enrollment closes at {} after the event starts at {}",
                    self.end_enrollment_at, self.start_at
                ),
            });
        }
        if self.start_at >= self.end_at {
            return Err(EnrollmentError::InvalidSchedule {
                message: format!(
                    "event ends at {} before it starts at {}",
                    self.end_at, self.start_at
                ),
            });
        }
        Ok(())
    }

    /// Event identifier
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Event title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// How new enrollments are decided
    #[must_use]
    pub fn enrollment_type(&self) -> EnrollmentType {
        self.enrollment_type
    }

    /// Capacity of accepted enrollments
    #[must_use]
    pub fn limit_of_enrollments(&self) -> u32 {
        self.limit_of_enrollments
    }

    /// Creation time (milliseconds since epoch)
    #[must_use]
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// End of the enrollment window (milliseconds since epoch)
    #[must_use]
    pub fn end_enrollment_at(&self) -> u64 {
        self.end_enrollment_at
    }

    /// Start of the event (milliseconds since epoch)
    #[must_use]
    pub fn start_at(&self) -> u64 {
        self.start_at
    }

    /// End of the event (milliseconds since epoch)
    #[must_use]
    pub fn end_at(&self) -> u64 {
        self.end_at
    }

    /// Returns `true` for first-come-first-served events.
    #[must_use]
    #[inline]
    pub fn is_fcfs(&self) -> bool {
        self.enrollment_type.is_fcfs()
    }

    /// Returns `true` if new enrollments are allowed at `now`.
    #[must_use]
    pub fn is_enrollable_at(&self, now: u64) -> bool {
        now < self.end_enrollment_at
    }

    /// Number of free spots given the current accepted count.
    #[must_use]
    pub fn remaining_spots(&self, accepted: u32) -> u32 {
        self.limit_of_enrollments.saturating_sub(accepted)
    }
}

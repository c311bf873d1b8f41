//! Core enrollment engine: admission, disenrollment and waitlist promotion.
//!
//! Every public operation runs inside exactly one
//! [`EnrollmentStore::transact`] scope for the event it touches, so the
//! capacity check-then-insert of `enroll` and the scan-then-update of
//! promotion are never interleaved with another operation on the same event.
//! Notices are delivered to the listener only after the unit of work commits.

use super::clock::EnrollmentClock;
use super::error::EnrollmentError;
use super::event::Event;
use super::notice::{EnrollmentListener, EnrollmentNotice, NoticeKind};
use super::record::Enrollment;
use super::store::{EnrollmentStore, EnrollmentUnitOfWork};
use super::types::{AccountId, EnrollmentId, EnrollmentType, EventId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, trace};

/// Result of a successful disenrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisenrollOutcome {
    /// The deleted enrollment, as it was before deletion.
    pub removed: Enrollment,
    /// The waiting enrollment that took the freed spot, if any.
    pub promoted: Option<Enrollment>,
}

/// Decides acceptance of enrollments and keeps FCFS waitlists moving.
///
/// The engine is storage-agnostic: all state lives in the
/// [`EnrollmentStore`] it is built with.
///
/// The capacity and type of an event are read from the [`Event`] passed to
/// each call, not from the store. Callers sharing an engine must share one
/// current `Event` per event id: an `enroll` issued with a copy taken before
/// an `update_limit` admits against the old limit. [`EventManager`] keeps a
/// single copy per event and needs `&mut self` to change it.
///
/// [`EventManager`]: super::manager::EventManager
pub struct EnrollmentEngine<S> {
    pub(super) store: S,
    pub(super) clock: Arc<EnrollmentClock>,
    /// listens to committed enrollment changes
    pub(super) listener: Option<EnrollmentListener>,
}

impl<S> EnrollmentEngine<S>
where
    S: EnrollmentStore,
{
    /// Create an engine over `store` without a listener.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(EnrollmentClock::new()),
            listener: None,
        }
    }

    /// Create an engine that reports committed changes to `listener`.
    pub fn with_listener(store: S, listener: EnrollmentListener) -> Self {
        let mut engine = Self::new(store);
        engine.listener = Some(listener);
        engine
    }

    /// Create an engine sharing an existing enrollment clock.
    ///
    /// Engines that write to the same store should share one clock so that
    /// `enrolled_at` stays strictly increasing across them.
    pub fn with_clock(store: S, clock: Arc<EnrollmentClock>) -> Self {
        Self {
            store,
            clock,
            listener: None,
        }
    }

    /// Replace the listener.
    pub fn set_listener(&mut self, listener: Option<EnrollmentListener>) {
        self.listener = listener;
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock stamping `enrolled_at`.
    #[must_use]
    pub fn clock(&self) -> &Arc<EnrollmentClock> {
        &self.clock
    }

    /// Enroll `account_id` in `event`.
    ///
    /// Confirmative events always start the enrollment as waiting. FCFS events
    /// accept it if fewer than `limit_of_enrollments` enrollments are accepted
    /// at the moment of insertion, and otherwise put it on the waitlist.
    ///
    /// The enrollment window is not checked here; see
    /// [`EventManager::enroll`](super::manager::EventManager::enroll).
    ///
    /// # Errors
    /// Returns [`EnrollmentError::AlreadyEnrolled`] if the account already
    /// holds an enrollment for the event, or [`EnrollmentError::Store`] if the
    /// unit of work fails. No state changes in either case.
    pub fn enroll(
        &self,
        event: &Event,
        account_id: AccountId,
    ) -> Result<Enrollment, EnrollmentError> {
        let event_id = event.id();
        let enrollment = self.store.transact(event_id, |uow| {
            if uow.exists_enrollment(account_id)? {
                return Err(EnrollmentError::AlreadyEnrolled {
                    event_id,
                    account_id,
                });
            }

            let accepted = match event.enrollment_type() {
                EnrollmentType::Confirmative => false,
                EnrollmentType::Fcfs => uow.count_accepted()? < event.limit_of_enrollments(),
            };
            let enrolled_at = self.clock.next();
            let id = uow.insert_enrollment(account_id, enrolled_at, accepted)?;

            Ok(Enrollment::new(
                id,
                event_id,
                account_id,
                enrolled_at,
                accepted,
            ))
        })?;

        trace!(
            "Enrolled {} in {} event {} (accepted: {})",
            account_id,
            event.enrollment_type(),
            event_id,
            enrollment.accepted
        );
        count_metric("enrollment_enrolled_total");
        self.notify(
            &enrollment,
            NoticeKind::Enrolled {
                accepted: enrollment.accepted,
            },
        );
        Ok(enrollment)
    }

    /// Remove the enrollment of `account_id` from `event`.
    ///
    /// When an accepted enrollment leaves an FCFS event, the waiting
    /// enrollment with the earliest `enrolled_at` is accepted in the same unit
    /// of work. Removing a waiting enrollment, or any enrollment of a
    /// confirmative event, touches nothing else.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::NotEnrolled`] if the account has no
    /// enrollment, or [`EnrollmentError::Store`] if the unit of work fails.
    pub fn disenroll(
        &self,
        event: &Event,
        account_id: AccountId,
    ) -> Result<DisenrollOutcome, EnrollmentError> {
        let event_id = event.id();
        let outcome = self.store.transact(event_id, |uow| {
            let removed = uow
                .delete_enrollment(account_id)?
                .ok_or(EnrollmentError::NotEnrolled {
                    event_id,
                    account_id,
                })?;

            let promoted = if event.is_fcfs() && removed.accepted {
                Self::promote_next(uow, event.limit_of_enrollments())?
            } else {
                None
            };

            Ok(DisenrollOutcome { removed, promoted })
        })?;

        trace!(
            "Disenrolled {} from event {} (was accepted: {})",
            account_id, event_id, outcome.removed.accepted
        );
        count_metric("enrollment_disenrolled_total");
        self.notify(
            &outcome.removed,
            NoticeKind::Disenrolled {
                was_accepted: outcome.removed.accepted,
            },
        );
        if let Some(ref promoted) = outcome.promoted {
            info!(
                "Promoted {} from the waitlist of event {}",
                promoted.account_id, event_id
            );
            count_metric("enrollment_promoted_total");
            self.notify(promoted, NoticeKind::Promoted);
        }
        Ok(outcome)
    }

    /// Accept a waiting enrollment of a confirmative event.
    ///
    /// Accepting an enrollment that is already accepted is a no-op.
    ///
    /// # Errors
    /// - [`EnrollmentError::InvalidOperation`] for FCFS events
    /// - [`EnrollmentError::EnrollmentNotFound`] if the id is unknown
    /// - [`EnrollmentError::EventFull`] if every spot is taken
    pub fn accept_enrollment(
        &self,
        event: &Event,
        enrollment_id: EnrollmentId,
    ) -> Result<Enrollment, EnrollmentError> {
        Self::require_confirmative(event, "accept")?;
        let event_id = event.id();
        let limit = event.limit_of_enrollments();

        let (enrollment, changed) = self.store.transact(event_id, |uow| {
            let mut enrollment = uow
                .find_by_id(enrollment_id)?
                .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;
            if enrollment.accepted {
                return Ok((enrollment, false));
            }
            if uow.count_accepted()? >= limit {
                return Err(EnrollmentError::EventFull { event_id, limit });
            }
            uow.set_accepted(enrollment_id, true)?;
            enrollment.accepted = true;
            Ok((enrollment, true))
        })?;

        if changed {
            trace!("Accepted enrollment {} of event {}", enrollment_id, event_id);
            self.notify(&enrollment, NoticeKind::Accepted);
        }
        Ok(enrollment)
    }

    /// Reject an enrollment of a confirmative event, returning it to waiting.
    ///
    /// A rejected enrollment also loses its check-in.
    ///
    /// # Errors
    /// - [`EnrollmentError::InvalidOperation`] for FCFS events
    /// - [`EnrollmentError::EnrollmentNotFound`] if the id is unknown
    pub fn reject_enrollment(
        &self,
        event: &Event,
        enrollment_id: EnrollmentId,
    ) -> Result<Enrollment, EnrollmentError> {
        Self::require_confirmative(event, "reject")?;
        let event_id = event.id();

        let (enrollment, changed) = self.store.transact(event_id, |uow| {
            let mut enrollment = uow
                .find_by_id(enrollment_id)?
                .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;
            if !enrollment.accepted {
                return Ok((enrollment, false));
            }
            uow.set_accepted(enrollment_id, false)?;
            if enrollment.attended {
                uow.set_attended(enrollment_id, false)?;
            }
            enrollment.accepted = false;
            enrollment.attended = false;
            Ok((enrollment, true))
        })?;

        if changed {
            trace!("Rejected enrollment {} of event {}", enrollment_id, event_id);
            self.notify(&enrollment, NoticeKind::Rejected);
        }
        Ok(enrollment)
    }

    /// Change the capacity of `event`.
    ///
    /// On FCFS events a larger limit promotes waiting enrollments, earliest
    /// first, until the new limit is reached or the waitlist is empty. The
    /// promoted enrollments are returned in promotion order.
    ///
    /// `event` is updated only after the unit of work commits.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::InvalidLimit`] if `new_limit` is zero or
    /// smaller than the number of accepted enrollments.
    pub fn update_limit(
        &self,
        event: &mut Event,
        new_limit: u32,
    ) -> Result<Vec<Enrollment>, EnrollmentError> {
        let event_id = event.id();
        let is_fcfs = event.is_fcfs();

        let promoted = self.store.transact(event_id, |uow| {
            let accepted = uow.count_accepted()?;
            if new_limit == 0 || new_limit < accepted {
                return Err(EnrollmentError::InvalidLimit {
                    requested: new_limit,
                    accepted,
                });
            }

            let mut promoted = Vec::new();
            if is_fcfs {
                while let Some(next) = Self::promote_next(uow, new_limit)? {
                    promoted.push(next);
                }
            }
            Ok(promoted)
        })?;

        info!(
            "Limit of event {} changed from {} to {} ({} promoted)",
            event_id,
            event.limit_of_enrollments,
            new_limit,
            promoted.len()
        );
        event.limit_of_enrollments = new_limit;
        for enrollment in &promoted {
            count_metric("enrollment_promoted_total");
            self.notify(enrollment, NoticeKind::Promoted);
        }
        Ok(promoted)
    }

    /// Mark an accepted enrollment as attended.
    ///
    /// # Errors
    /// - [`EnrollmentError::EnrollmentNotFound`] if the id is unknown
    /// - [`EnrollmentError::InvalidOperation`] if the enrollment is waiting
    pub fn check_in(
        &self,
        event: &Event,
        enrollment_id: EnrollmentId,
    ) -> Result<Enrollment, EnrollmentError> {
        let enrollment = self.store.transact(event.id(), |uow| {
            let mut enrollment = uow
                .find_by_id(enrollment_id)?
                .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;
            if !enrollment.accepted {
                return Err(EnrollmentError::InvalidOperation {
                    message: format!("enrollment {enrollment_id} is not accepted"),
                });
            }
            uow.set_attended(enrollment_id, true)?;
            enrollment.attended = true;
            Ok(enrollment)
        })?;

        self.notify(&enrollment, NoticeKind::CheckedIn);
        Ok(enrollment)
    }

    /// Revert a check-in.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::EnrollmentNotFound`] if the id is unknown.
    pub fn cancel_check_in(
        &self,
        event: &Event,
        enrollment_id: EnrollmentId,
    ) -> Result<Enrollment, EnrollmentError> {
        let enrollment = self.store.transact(event.id(), |uow| {
            let mut enrollment = uow
                .find_by_id(enrollment_id)?
                .ok_or(EnrollmentError::EnrollmentNotFound(enrollment_id))?;
            uow.set_attended(enrollment_id, false)?;
            enrollment.attended = false;
            Ok(enrollment)
        })?;

        self.notify(&enrollment, NoticeKind::CheckInCancelled);
        Ok(enrollment)
    }

    /// All enrollments of an event, earliest first.
    pub fn enrollments(&self, event_id: EventId) -> Result<Vec<Enrollment>, EnrollmentError> {
        self.store.transact(event_id, |uow| Ok(uow.enrollments()?))
    }

    /// The enrollment of `account_id` in the event, if any.
    pub fn enrollment_of(
        &self,
        event_id: EventId,
        account_id: AccountId,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        self.store
            .transact(event_id, |uow| Ok(uow.find_enrollment(account_id)?))
    }

    /// Number of accepted enrollments.
    pub fn accepted_count(&self, event_id: EventId) -> Result<u32, EnrollmentError> {
        self.store.transact(event_id, |uow| Ok(uow.count_accepted()?))
    }

    /// Number of waiting enrollments.
    pub fn waiting_count(&self, event_id: EventId) -> Result<usize, EnrollmentError> {
        self.store.transact(event_id, |uow| {
            Ok(uow
                .enrollments()?
                .iter()
                .filter(|enrollment| enrollment.is_waiting())
                .count())
        })
    }

    /// Spots still free in `event`.
    pub fn remaining_spots(&self, event: &Event) -> Result<u32, EnrollmentError> {
        let accepted = self.accepted_count(event.id())?;
        Ok(event.remaining_spots(accepted))
    }

    /// Delete every enrollment of a cancelled event.
    pub fn cancel_event(&self, event_id: EventId) -> Result<usize, EnrollmentError> {
        let removed = self.store.remove_event(event_id)?;
        info!("Cancelled event {}: {} enrollments removed", event_id, removed);
        Ok(removed)
    }

    /// Accept the earliest waiting enrollment if a spot is free under `limit`.
    fn promote_next(
        uow: &mut (dyn EnrollmentUnitOfWork + '_),
        limit: u32,
    ) -> Result<Option<Enrollment>, EnrollmentError> {
        if uow.count_accepted()? >= limit {
            return Ok(None);
        }
        let Some(mut next) = uow.find_earliest_waiting()? else {
            return Ok(None);
        };
        uow.set_accepted(next.id, true)?;
        next.accepted = true;
        Ok(Some(next))
    }

    fn require_confirmative(event: &Event, action: &str) -> Result<(), EnrollmentError> {
        if event.enrollment_type() == EnrollmentType::Confirmative {
            Ok(())
        } else {
            Err(EnrollmentError::InvalidOperation {
                message: format!(
                    "cannot {action} enrollments manually in {} event {}",
                    event.enrollment_type(),
                    event.id()
                ),
            })
        }
    }

    pub(super) fn notify(&self, enrollment: &Enrollment, kind: NoticeKind) {
        if let Some(ref listener) = self.listener {
            listener(&EnrollmentNotice::new(enrollment, kind));
        }
    }
}

#[cfg(feature = "metrics")]
fn count_metric(name: &'static str) {
    metrics::counter!(name).increment(1);
}

#[cfg(not(feature = "metrics"))]
#[inline]
fn count_metric(_name: &'static str) {}

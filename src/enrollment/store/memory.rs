//! In-memory enrollment store with per-event locking.
//!
//! Each event owns a ledger behind its own mutex, held in a concurrent map so
//! that units of work for different events never contend. A unit of work runs
//! against a staged copy of the ledger; the copy replaces the ledger only when
//! the work succeeds. Ledgers left empty are dropped from the map, and a unit
//! of work that finds its ledger dropped while waiting for the lock starts over
//! on the current one.

use super::error::StoreError;
use super::unit_of_work::{EnrollmentStore, EnrollmentUnitOfWork};
use crate::enrollment::error::EnrollmentError;
use crate::enrollment::record::Enrollment;
use crate::enrollment::types::{AccountId, EnrollmentId, EventId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Enrollments of one event, kept sorted by `enrolled_at`.
#[derive(Debug, Clone, Default)]
struct EventLedger {
    enrollments: Vec<Enrollment>,
}

impl EventLedger {
    fn position_of_account(&self, account_id: AccountId) -> Option<usize> {
        self.enrollments
            .iter()
            .position(|enrollment| enrollment.account_id == account_id)
    }

    fn get_mut(&mut self, enrollment_id: EnrollmentId) -> Result<&mut Enrollment, StoreError> {
        self.enrollments
            .iter_mut()
            .find(|enrollment| enrollment.id == enrollment_id)
            .ok_or(StoreError::EnrollmentMissing(enrollment_id))
    }
}

/// Reference [`EnrollmentStore`] backed by process memory.
#[derive(Debug)]
pub struct InMemoryEnrollmentStore {
    ledgers: DashMap<EventId, Arc<Mutex<EventLedger>>>,
    next_enrollment_id: AtomicU64,
}

impl InMemoryEnrollmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            ledgers: DashMap::new(),
            next_enrollment_id: AtomicU64::new(1),
        }
    }

    /// Number of events that currently have a ledger.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.ledgers.len()
    }

    fn ledger(&self, event_id: EventId) -> Arc<Mutex<EventLedger>> {
        Arc::clone(self.ledgers.entry(event_id).or_default().value())
    }

    /// Whether `ledger` is still the one registered for `event_id`.
    fn is_current(&self, event_id: EventId, ledger: &Arc<Mutex<EventLedger>>) -> bool {
        self.ledgers
            .get(&event_id)
            .is_some_and(|current| Arc::ptr_eq(current.value(), ledger))
    }

    /// Drop `ledger` from the map if it is still registered for `event_id`.
    fn unregister(&self, event_id: EventId, ledger: &Arc<Mutex<EventLedger>>) -> bool {
        self.ledgers
            .remove_if(&event_id, |_, current| Arc::ptr_eq(current, ledger))
            .is_some()
    }
}

impl Default for InMemoryEnrollmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrollmentStore for InMemoryEnrollmentStore {
    fn transact<R, F>(&self, event_id: EventId, work: F) -> Result<R, EnrollmentError>
    where
        F: FnOnce(&mut dyn EnrollmentUnitOfWork) -> Result<R, EnrollmentError>,
    {
        loop {
            let ledger = self.ledger(event_id);
            let mut guard = ledger.lock().map_err(|_| StoreError::LockPoisoned)?;
            // The ledger may have been removed while we waited for the lock.
            if !self.is_current(event_id, &ledger) {
                continue;
            }

            let mut staged = StagedLedger {
                event_id,
                ledger: guard.clone(),
                ids: &self.next_enrollment_id,
            };
            let result = work(&mut staged);
            if result.is_ok() {
                *guard = staged.ledger;
                trace!(
                    "Committed unit of work for event {} ({} enrollments)",
                    event_id,
                    guard.enrollments.len()
                );
            }

            // Empty ledgers are not kept, so queries on unknown events leave no trace.
            if guard.enrollments.is_empty() {
                self.unregister(event_id, &ledger);
            }
            return result;
        }
    }

    fn remove_event(&self, event_id: EventId) -> Result<usize, StoreError> {
        loop {
            let Some(ledger) = self
                .ledgers
                .get(&event_id)
                .map(|entry| Arc::clone(entry.value()))
            else {
                return Ok(0);
            };
            let mut guard = ledger.lock().map_err(|_| StoreError::LockPoisoned)?;
            if !self.unregister(event_id, &ledger) {
                continue;
            }

            let removed = guard.enrollments.len();
            guard.enrollments.clear();
            trace!("Removed {} enrollments of event {}", removed, event_id);
            return Ok(removed);
        }
    }
}

/// Working copy of a ledger for the duration of one unit of work.
struct StagedLedger<'a> {
    event_id: EventId,
    ledger: EventLedger,
    ids: &'a AtomicU64,
}

impl EnrollmentUnitOfWork for StagedLedger<'_> {
    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn exists_enrollment(&self, account_id: AccountId) -> Result<bool, StoreError> {
        Ok(self.ledger.position_of_account(account_id).is_some())
    }

    fn find_enrollment(&self, account_id: AccountId) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .ledger
            .position_of_account(account_id)
            .map(|index| self.ledger.enrollments[index].clone()))
    }

    fn find_by_id(&self, enrollment_id: EnrollmentId) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .ledger
            .enrollments
            .iter()
            .find(|enrollment| enrollment.id == enrollment_id)
            .cloned())
    }

    fn count_accepted(&self) -> Result<u32, StoreError> {
        let accepted = self
            .ledger
            .enrollments
            .iter()
            .filter(|enrollment| enrollment.accepted)
            .count();
        Ok(u32::try_from(accepted).unwrap_or(u32::MAX))
    }

    fn insert_enrollment(
        &mut self,
        account_id: AccountId,
        enrolled_at: u64,
        accepted: bool,
    ) -> Result<EnrollmentId, StoreError> {
        let id = EnrollmentId::new(self.ids.fetch_add(1, Ordering::Relaxed));
        let record = Enrollment::new(id, self.event_id, account_id, enrolled_at, accepted);

        // Keep FCFS order even if a caller supplies an older timestamp.
        let index = self
            .ledger
            .enrollments
            .partition_point(|existing| existing.enrolled_at <= enrolled_at);
        self.ledger.enrollments.insert(index, record);
        Ok(id)
    }

    fn delete_enrollment(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .ledger
            .position_of_account(account_id)
            .map(|index| self.ledger.enrollments.remove(index)))
    }

    fn find_earliest_waiting(&self) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .ledger
            .enrollments
            .iter()
            .filter(|enrollment| enrollment.is_waiting())
            .min_by_key(|enrollment| enrollment.enrolled_at)
            .cloned())
    }

    fn set_accepted(
        &mut self,
        enrollment_id: EnrollmentId,
        accepted: bool,
    ) -> Result<(), StoreError> {
        self.ledger.get_mut(enrollment_id)?.accepted = accepted;
        Ok(())
    }

    fn set_attended(
        &mut self,
        enrollment_id: EnrollmentId,
        attended: bool,
    ) -> Result<(), StoreError> {
        self.ledger.get_mut(enrollment_id)?.attended = attended;
        Ok(())
    }

    fn enrollments(&self) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self.ledger.enrollments.clone())
    }

    fn replace_all(&mut self, mut records: Vec<Enrollment>) -> Result<(), StoreError> {
        records.sort_by_key(|record| record.enrolled_at);
        if let Some(max_id) = records.iter().map(|record| record.id.as_u64()).max() {
            self.ids.fetch_max(max_id + 1, Ordering::Relaxed);
        }
        self.ledger.enrollments = records;
        Ok(())
    }
}

//! Enrollment snapshots for backup and restore

use super::engine::EnrollmentEngine;
use super::error::EnrollmentError;
use super::event::Event;
use super::record::Enrollment;
use super::store::EnrollmentStore;
use super::types::EventId;
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{info, trace};

/// The enrollments of one event at a specific point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnrollmentSnapshot {
    /// Event the enrollments belong to
    pub event_id: EventId,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Enrollments ordered by `enrolled_at`
    pub enrollments: Vec<Enrollment>,
}

impl EventEnrollmentSnapshot {
    /// Number of accepted enrollments in the snapshot
    pub fn accepted_count(&self) -> usize {
        self.enrollments.iter().filter(|e| e.accepted).count()
    }

    /// Number of waiting enrollments in the snapshot
    pub fn waiting_count(&self) -> usize {
        self.enrollments.len() - self.accepted_count()
    }

    /// Latest `enrolled_at` in the snapshot
    pub fn newest_enrolled_at(&self) -> Option<u64> {
        let newest = self.enrollments.iter().map(|e| e.enrolled_at).max();
        trace!("newest_enrolled_at: {:?}", newest);
        newest
    }
}

/// Format version used for checksum-enabled enrollment snapshots.
pub const ENROLLMENT_SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for `EventEnrollmentSnapshot` instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentSnapshotPackage {
    /// Version of the snapshot schema for forward compatibility.
    pub version: u32,
    /// Snapshot payload.
    pub snapshot: EventEnrollmentSnapshot,
    /// Hex-encoded checksum of the serialized snapshot.
    pub checksum: String,
}

impl EnrollmentSnapshotPackage {
    /// Creates a new snapshot package computing the checksum of the snapshot contents.
    pub fn new(snapshot: EventEnrollmentSnapshot) -> Result<Self, EnrollmentError> {
        let checksum = Self::compute_checksum(&snapshot)?;

        Ok(Self {
            version: ENROLLMENT_SNAPSHOT_FORMAT_VERSION,
            snapshot,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, EnrollmentError> {
        serde_json::to_string(self).map_err(|error| EnrollmentError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, EnrollmentError> {
        serde_json::from_str(data).map_err(|error| EnrollmentError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the checksum and version.
    pub fn validate(&self) -> Result<(), EnrollmentError> {
        if self.version != ENROLLMENT_SNAPSHOT_FORMAT_VERSION {
            return Err(EnrollmentError::InvalidOperation {
                message: format!(
                    "Unsupported snapshot version: {} (expected {})",
                    self.version, ENROLLMENT_SNAPSHOT_FORMAT_VERSION
                ),
            });
        }

        let computed = Self::compute_checksum(&self.snapshot)?;
        if computed != self.checksum {
            return Err(EnrollmentError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated snapshot.
    pub fn into_snapshot(self) -> Result<EventEnrollmentSnapshot, EnrollmentError> {
        self.validate()?;
        Ok(self.snapshot)
    }

    fn compute_checksum(snapshot: &EventEnrollmentSnapshot) -> Result<String, EnrollmentError> {
        let payload =
            serde_json::to_vec(snapshot).map_err(|error| EnrollmentError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        let checksum_bytes = hasher.finalize();
        Ok(format!("{:x}", checksum_bytes))
    }
}

impl<S> EnrollmentEngine<S>
where
    S: EnrollmentStore,
{
    /// Capture the enrollments of an event.
    pub fn snapshot(&self, event_id: EventId) -> Result<EventEnrollmentSnapshot, EnrollmentError> {
        let enrollments = self.enrollments(event_id)?;
        Ok(EventEnrollmentSnapshot {
            event_id,
            timestamp: current_time_millis(),
            enrollments,
        })
    }

    /// Capture the enrollments of an event into a checksummed package.
    pub fn create_snapshot_package(
        &self,
        event_id: EventId,
    ) -> Result<EnrollmentSnapshotPackage, EnrollmentError> {
        EnrollmentSnapshotPackage::new(self.snapshot(event_id)?)
    }

    /// Capture the enrollments of an event as JSON.
    pub fn snapshot_to_json(&self, event_id: EventId) -> Result<String, EnrollmentError> {
        self.create_snapshot_package(event_id)?.to_json()
    }

    /// Replace the enrollments of `event` with the contents of `package`.
    ///
    /// The package must be valid and belong to `event`. Accounts and
    /// enrollment ids must be unique, only accepted enrollments may be
    /// checked in, and FCFS events may hold no more accepted
    /// enrollments than the event's limit. Returns the number of restored
    /// enrollments.
    pub fn restore_from_snapshot_package(
        &self,
        event: &Event,
        package: EnrollmentSnapshotPackage,
    ) -> Result<usize, EnrollmentError> {
        let snapshot = package.into_snapshot()?;

        if snapshot.event_id != event.id() {
            return Err(EnrollmentError::InvalidOperation {
                message: format!(
                    "Snapshot event mismatch: expected {}, got {}",
                    event.id(),
                    snapshot.event_id
                ),
            });
        }

        let mut accounts = HashSet::with_capacity(snapshot.enrollments.len());
        let mut ids = HashSet::with_capacity(snapshot.enrollments.len());
        for enrollment in &snapshot.enrollments {
            let attended_while_waiting = enrollment.attended && !enrollment.accepted;
            if enrollment.event_id != event.id()
                || attended_while_waiting
                || !accounts.insert(enrollment.account_id)
                || !ids.insert(enrollment.id)
            {
                return Err(EnrollmentError::InvalidOperation {
                    message: format!(
                        "Snapshot contains an invalid enrollment {} for account {}",
                        enrollment.id, enrollment.account_id
                    ),
                });
            }
        }

        if event.is_fcfs() && snapshot.accepted_count() > event.limit_of_enrollments() as usize {
            return Err(EnrollmentError::InvalidLimit {
                requested: event.limit_of_enrollments(),
                accepted: u32::try_from(snapshot.accepted_count()).unwrap_or(u32::MAX),
            });
        }

        let newest = snapshot.newest_enrolled_at();
        let restored = snapshot.enrollments.len();
        self.store.transact(event.id(), |uow| {
            uow.replace_all(snapshot.enrollments)?;
            Ok(())
        })?;

        if let Some(newest) = newest {
            self.clock.observe(newest);
        }
        info!("Restored {} enrollments of event {}", restored, event.id());
        Ok(restored)
    }

    /// Restore the enrollments of `event` from a JSON package.
    pub fn restore_from_snapshot_json(
        &self,
        event: &Event,
        data: &str,
    ) -> Result<usize, EnrollmentError> {
        let package = EnrollmentSnapshotPackage::from_json(data)?;
        self.restore_from_snapshot_package(event, package)
    }
}

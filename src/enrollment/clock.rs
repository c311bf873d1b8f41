//! Strictly increasing enrollment timestamps.
//!
//! FCFS order is defined by `enrolled_at`, so two enrollments must never share
//! a timestamp even when they land in the same millisecond. The clock hands out
//! wall-clock milliseconds, bumped by one whenever the wall clock has not moved
//! past the last value issued.

use crate::utils::current_time_millis;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of `enrolled_at` values.
#[derive(Debug, Default)]
pub struct EnrollmentClock {
    last: AtomicU64,
}

impl EnrollmentClock {
    /// Creates a clock that has not issued any timestamp yet.
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Creates a clock whose next value is strictly greater than `floor`.
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Issues the next timestamp.
    ///
    /// Every returned value is strictly greater than all values previously
    /// returned by this clock.
    pub fn next(&self) -> u64 {
        let now = current_time_millis();
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = if now > current {
                now
            } else {
                current.saturating_add(1)
            };
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }

    /// Makes sure later timestamps come after `seen`.
    ///
    /// Used after restoring enrollments that were stamped by another clock.
    pub fn observe(&self, seen: u64) {
        self.last.fetch_max(seen, Ordering::AcqRel);
    }

    /// Last timestamp issued or observed.
    #[must_use]
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

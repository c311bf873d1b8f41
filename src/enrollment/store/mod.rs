//! Enrollment storage subsystem.
//!
//! This module defines the contract between the enrollment engine and the
//! durable home of enrollment records, plus an in-memory implementation.
//!
//! # Types
//!
//! - [`EnrollmentStore`]: opens atomic, event-scoped units of work
//! - [`EnrollmentUnitOfWork`]: the queries the engine issues inside one
//! - [`StoreError`]: error type for store backends
//! - [`InMemoryEnrollmentStore`]: per-event locked in-memory backend

pub mod error;
pub mod memory;
pub mod unit_of_work;

pub use error::StoreError;
pub use memory::InMemoryEnrollmentStore;
pub use unit_of_work::{EnrollmentStore, EnrollmentUnitOfWork};

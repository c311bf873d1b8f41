/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Prelude module that re-exports commonly used types and traits.
//!
//! This module provides a convenient way to import the most commonly used
//! types, traits, and functions from the study-enrollment crate. Instead of
//! importing each type individually, you can use:
//!
//! ```rust
//! use study_enrollment::prelude::*;
//! ```
//!
//! This will import all the essential types needed for working with the engine.

// Core engine types
pub use crate::enrollment::engine::{DisenrollOutcome, EnrollmentEngine};
pub use crate::enrollment::error::EnrollmentError;
pub use crate::enrollment::event::Event;
pub use crate::enrollment::manager::{EventManager, EventManagerStd, EventManagerTokio};

// Records and identifiers
pub use crate::enrollment::record::{Enrollment, EnrollmentStatus};
pub use crate::enrollment::types::{AccountId, EnrollmentId, EnrollmentType, EventId};

// Storage
pub use crate::enrollment::store::{
    EnrollmentStore, EnrollmentUnitOfWork, InMemoryEnrollmentStore, StoreError,
};

// Notices
pub use crate::enrollment::notice::{EnrollmentListener, EnrollmentNotice, NoticeKind};

// Snapshot types
pub use crate::enrollment::snapshot::{EnrollmentSnapshotPackage, EventEnrollmentSnapshot};

// Utility functions
pub use crate::utils::current_time_millis;

// Type aliases for common use cases
pub use crate::DefaultEnrollmentEngine;

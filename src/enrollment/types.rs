//! Identifiers and enumerations shared across the enrollment engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace used to derive stable account identifiers from nicknames.
const ACCOUNT_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_9a2e_44b7_4d0e_9c51_27e3_a8d4_0b6f);

/// Unique identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generates a fresh random event identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the enrolling account.
///
/// Accounts are resolved by an external collaborator; the engine only needs a
/// stable identity to enforce one enrollment per (event, account).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generates a fresh random account identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a stable identifier from an account nickname.
    ///
    /// The same nickname always yields the same identifier.
    pub fn from_name(nickname: &str) -> Self {
        Self(Uuid::new_v5(&ACCOUNT_NAMESPACE, nickname.as_bytes()))
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identifier of a single enrollment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(u64);

impl EnrollmentId {
    /// Wraps a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an event decides whether a new enrollment is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentType {
    /// First come, first served: accepted automatically while spots remain,
    /// otherwise placed on a FIFO waitlist.
    #[default]
    Fcfs,

    /// Every enrollment waits until a study manager accepts it.
    Confirmative,
}

impl EnrollmentType {
    /// Returns `true` for first-come-first-served events.
    #[must_use]
    #[inline]
    pub fn is_fcfs(self) -> bool {
        self == EnrollmentType::Fcfs
    }
}

impl fmt::Display for EnrollmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentType::Fcfs => write!(f, "FCFS"),
            EnrollmentType::Confirmative => write!(f, "CONFIRMATIVE"),
        }
    }
}

impl FromStr for EnrollmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(EnrollmentType::Fcfs),
            "CONFIRMATIVE" => Ok(EnrollmentType::Confirmative),
            other => Err(format!("unknown enrollment type: {other}")),
        }
    }
}

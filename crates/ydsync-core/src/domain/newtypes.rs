//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Canonical textual form of a [`ModifiedAt`] timestamp.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of characters in the canonical form (`YYYY-MM-DD HH:MM:SS`).
const CANONICAL_LEN: usize = 19;

// ============================================================================
// ModifiedAt
// ============================================================================

/// A file modification time with whole-second precision, in UTC.
///
/// Local filesystem times and remote listing times are both normalized into
/// this type, so ordering two values is a chronological comparison at second
/// granularity. The [`Display`] form is `YYYY-MM-DD HH:MM:SS`, whose
/// lexicographic order matches the chronological one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModifiedAt(NaiveDateTime);

impl ModifiedAt {
    /// Parses a timestamp as reported by the remote API or written by hand.
    ///
    /// Accepts RFC 3339 values with an offset (`2024-01-01T10:00:00+03:00`),
    /// which are converted to UTC, and offset-less values using either `T` or
    /// a space as the date/time separator. Fractional seconds are dropped.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTimestamp`] if no supported form matches.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_naive(with_offset.naive_utc()));
        }

        // Offset-less form: keep the first 19 characters, unify the separator
        let head: String = trimmed
            .chars()
            .take(CANONICAL_LEN)
            .map(|c| if c == 'T' || c == 't' { ' ' } else { c })
            .collect();

        NaiveDateTime::parse_from_str(&head, CANONICAL_FORMAT)
            .map(Self::from_naive)
            .map_err(|e| DomainError::InvalidTimestamp(format!("{raw}: {e}")))
    }

    /// Wraps a naive UTC datetime, truncating it to whole seconds.
    #[must_use]
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    /// Converts a filesystem modification time.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        let utc: DateTime<Utc> = time.into();
        Self::from_naive(utc.naive_utc())
    }

    /// Returns the underlying naive UTC datetime.
    #[must_use]
    pub const fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl Display for ModifiedAt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for ModifiedAt {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModifiedAt {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModifiedAt> for String {
    fn from(value: ModifiedAt) -> Self {
        value.to_string()
    }
}

// ============================================================================
// RemoteDir
// ============================================================================

/// The remote directory prefix that mirrors the tracked local directory
/// (e.g. `disk:/Backup/`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteDir(String);

impl RemoteDir {
    /// Create a new RemoteDir
    ///
    /// # Errors
    /// Returns error if the prefix is empty or blank
    pub fn new(dir: impl Into<String>) -> Result<Self, DomainError> {
        let dir = dir.into();
        if dir.trim().is_empty() {
            return Err(DomainError::InvalidRemoteDir(
                "remote directory must not be empty".to_string(),
            ));
        }
        Ok(Self(dir))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the remote path of a file directly inside this directory.
    ///
    /// Exactly one `/` separates the prefix and the name, whether or not the
    /// configured prefix ends with one.
    ///
    /// # Errors
    /// Returns error if `name` is empty or contains a `/`
    pub fn join(&self, name: &str) -> Result<String, DomainError> {
        if name.is_empty() || name.contains('/') {
            return Err(DomainError::InvalidFileName(name.to_string()));
        }

        if self.0.ends_with('/') {
            Ok(format!("{}{name}", self.0))
        } else {
            Ok(format!("{}/{name}", self.0))
        }
    }
}

impl Display for RemoteDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

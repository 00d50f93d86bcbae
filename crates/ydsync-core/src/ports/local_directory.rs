//! Local directory port (driven/secondary port)
//!
//! This module defines the interface for reading the tracked local
//! directory: a flat, non-recursive listing of regular files together with
//! their modification times.
//!
//! ## Design Notes
//!
//! - Uses `std::io::Result` so callers can tell a missing or unreadable
//!   tracked directory apart from other failures.
//! - The listing is a snapshot: each call reads the directory afresh and
//!   nothing is cached between calls.

use std::path::Path;

use crate::domain::LocalFileRecord;

/// Port trait for reading the tracked directory
///
/// ## Implementation Notes
///
/// - Only regular files directly inside `dir` are returned; subdirectories
///   and special files are skipped.
/// - Modification times are normalized to whole seconds in UTC.
/// - An entry that disappears between the directory read and its metadata
///   read is skipped rather than failing the listing.
#[async_trait::async_trait]
pub trait ILocalDirectory: Send + Sync {
    /// Lists regular files directly inside `dir`
    ///
    /// # Errors
    /// Returns an error if `dir` does not exist, is not a directory, or
    /// cannot be read
    async fn list_files(&self, dir: &Path) -> std::io::Result<Vec<LocalFileRecord>>;
}

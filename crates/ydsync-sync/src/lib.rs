//! ydsync Sync - one-way reconciliation engine
//!
//! Provides:
//! - Flat listing of the tracked local directory
//! - Pure reconciliation planning (upload new/newer, delete remote-only)
//! - Bounded execution of the plan against an [`IRemoteStorage`](ydsync_core::ports::IRemoteStorage)
//!
//! ## Modules
//!
//! - [`engine`] - Sync pass orchestration and the reconciliation plan
//! - [`filesystem`] - Local directory adapter

pub mod engine;
pub mod filesystem;

use std::path::PathBuf;

use thiserror::Error;
use ydsync_core::ports::StorageError;

/// Errors that abort a whole synchronization pass
///
/// Per-file failures never surface here; they are collected in
/// [`SyncResult::errors`](engine::SyncResult::errors).
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote directory listing could not be obtained
    #[error("Failed to list remote directory: {0}")]
    RemoteListFailed(#[source] StorageError),

    /// The tracked local directory is missing or unreadable
    #[error("Tracked directory {} is not accessible: {source}", .path.display())]
    TrackedDirectoryMissing {
        /// The configured tracked directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Whether the error should terminate the process instead of waiting for
    /// the next pass
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TrackedDirectoryMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_failure_is_not_fatal() {
        let err = SyncError::RemoteListFailed(StorageError::Network("timed out".to_string()));
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let err = SyncError::TrackedDirectoryMissing {
            path: PathBuf::from("/srv/backup"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/srv/backup"));
    }
}

//! Remote storage port (driven/secondary port)
//!
//! This module defines the interface for the remote side of a pass: one
//! directory on a cloud drive, scoped by the configured remote prefix.
//! The primary implementation targets the Yandex Disk REST API.
//!
//! ## Design Notes
//!
//! - Unlike most adapter errors, storage failures are classified here with
//!   [`StorageError`]: the sync engine treats per-file failures differently
//!   from listing failures, and the upload status classes are part of the
//!   contract.
//! - Uses `#[async_trait]` for async trait methods.
//! - Listing returns a [`RemoteListing`] already normalized to [`ModifiedAt`]
//!   so callers never compare raw API strings.
//!
//! [`ModifiedAt`]: crate::domain::ModifiedAt

use std::path::Path;

use thiserror::Error;

use crate::domain::{DiskQuota, RemoteListing};

/// User-facing guidance attached to [`StorageError::FileTooLarge`].
pub const UPLOAD_SIZE_LIMITS: &str = "Yandex Disk accepts files up to 1 GB \
     without a subscription and up to 50 GB with a Yandex 360 subscription";

/// Successful result of a per-file remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The file bytes were transferred and the remote copy now exists
    Uploaded,
    /// The remote copy was removed
    Deleted,
}

/// Errors returned by [`IRemoteStorage`] operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The API answered with a non-success status; `message` is the
    /// server-supplied explanation
    #[error("API request failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-supplied message
        message: String,
    },

    /// The upload was rejected as too large (HTTP 413)
    #[error("File too large: {name}. {}", UPLOAD_SIZE_LIMITS)]
    FileTooLarge {
        /// Name of the rejected file
        name: String,
    },

    /// The account has no space left for the upload (HTTP 507)
    #[error("Storage quota exceeded while uploading {name}")]
    QuotaExceeded {
        /// Name of the rejected file
        name: String,
    },

    /// The upload target failed on the server side (5xx); worth retrying on a
    /// later pass
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Any other non-success status from the upload target
    #[error("Unexpected response ({status}): {body}")]
    Unknown {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response (connect failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The local file could not be opened or read
    #[error("Local I/O error: {0}")]
    Io(String),

    /// The response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl StorageError {
    /// Whether the failure is expected to clear up by itself, so the next
    /// scheduled pass is likely to succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServerError { .. } | Self::Network(_))
    }
}

/// Port trait for remote storage operations
///
/// Every method is scoped to the single remote directory the implementation
/// was constructed for. Implementations must not retry internally: transient
/// failures are retried by the next pass from a fresh snapshot.
#[async_trait::async_trait]
pub trait IRemoteStorage: Send + Sync {
    /// Reads account storage usage
    async fn get_quota(&self) -> Result<DiskQuota, StorageError>;

    /// Lists the files directly inside the remote directory
    ///
    /// # Returns
    /// File name to normalized modification time. Folders are not included.
    async fn list_files(&self) -> Result<RemoteListing, StorageError>;

    /// Uploads a local file into the remote directory, overwriting any
    /// existing remote file with the same name
    ///
    /// # Arguments
    /// * `local_path` - Path of the local file; its base name becomes the
    ///   remote name
    async fn upload(&self, local_path: &Path) -> Result<OperationOutcome, StorageError>;

    /// Deletes a file from the remote directory
    ///
    /// # Arguments
    /// * `file_name` - Name of the file inside the remote directory
    async fn delete(&self, file_name: &str) -> Result<OperationOutcome, StorageError>;
}

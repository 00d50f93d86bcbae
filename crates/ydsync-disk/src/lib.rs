//! ydsync Disk - Yandex Disk REST API client
//!
//! Provides an async client for:
//! - Account quota (`GET /v1/disk/`)
//! - Flat directory listings (`GET /v1/disk/resources`)
//! - Two-phase uploads (upload link + streamed `PUT`)
//! - File deletion (`DELETE /v1/disk/resources`)
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client, endpoint construction, quota
//! - [`resources`] - Directory listing and deletion
//! - [`upload`] - Upload link negotiation and byte transfer
//! - [`provider`] - [`IRemoteStorage`](ydsync_core::ports::IRemoteStorage) adapter

pub mod client;
pub mod provider;
pub mod resources;
pub mod upload;

use thiserror::Error;
use ydsync_core::domain::DomainError;
use ydsync_core::ports::StorageError;

/// Errors that can occur when communicating with the Yandex Disk API
#[derive(Debug, Error)]
pub enum DiskError {
    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-supplied message (`message` or `description` field)
        message: String,
    },

    /// The upload target rejected the payload as too large (413)
    #[error("File too large: {name}")]
    FileTooLarge {
        /// Name of the rejected file
        name: String,
    },

    /// The account ran out of space during an upload (507)
    #[error("Insufficient storage while uploading {name}")]
    QuotaExceeded {
        /// Name of the rejected file
        name: String,
    },

    /// A server-side error occurred on the upload target (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The upload target answered with an unexpected status
    #[error("Unexpected status {status}: {body}")]
    Unknown {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The local file could not be read
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configured base URL or an endpoint could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A name or remote path failed validation
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<DiskError> for StorageError {
    fn from(err: DiskError) -> Self {
        match err {
            DiskError::Api { status, message } => StorageError::Api { status, message },
            DiskError::FileTooLarge { name } => StorageError::FileTooLarge { name },
            DiskError::QuotaExceeded { name } => StorageError::QuotaExceeded { name },
            DiskError::ServerError { status, message } => {
                StorageError::ServerError { status, message }
            }
            DiskError::Unknown { status, body } => StorageError::Unknown { status, body },
            DiskError::NetworkError(e) => StorageError::Network(e.to_string()),
            DiskError::IoError(e) => StorageError::Io(e.to_string()),
            DiskError::InvalidUrl(e) => StorageError::InvalidResponse(e.to_string()),
            DiskError::DomainError(e) => StorageError::Io(e.to_string()),
            DiskError::InvalidResponse(msg) => StorageError::InvalidResponse(msg),
        }
    }
}

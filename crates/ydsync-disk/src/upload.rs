//! Upload operations for the Yandex Disk API
//!
//! Uploading is a two-phase exchange:
//! 1. [`request_upload_link`] - `GET /v1/disk/resources/upload` returns a
//!    pre-signed target URL (`href`) and the HTTP method to use
//! 2. [`upload_file`] - streams the file bytes to that URL
//!
//! The target URL belongs to an upload server, not the API root, and is
//! called without the `Authorization` header. Its status codes are classified
//! by [`classify_upload_status`].

use std::path::Path;

use reqwest::{header::CONTENT_TYPE, Body, Method, StatusCode};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::client::{DiskClient, UPLOAD_ENDPOINT};
use crate::DiskError;

/// Response from the upload link endpoint
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadLink {
    /// Pre-signed upload URL
    pub href: String,
    /// HTTP method to use against `href` (normally `PUT`)
    #[serde(default)]
    pub method: Option<String>,
    /// Whether `href` is a URL template
    #[serde(default)]
    pub templated: bool,
}

impl UploadLink {
    /// Method to call `href` with, defaulting to `PUT`
    pub fn http_method(&self) -> Method {
        self.method
            .as_deref()
            .and_then(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()).ok())
            .unwrap_or(Method::PUT)
    }
}

/// Requests an upload link for a file inside the client's remote directory
///
/// The link always carries `overwrite=true`, so an existing remote file with
/// the same name is replaced.
///
/// # Errors
/// Returns [`DiskError::Api`] with the server message on a non-success status
pub async fn request_upload_link(client: &DiskClient, name: &str) -> Result<UploadLink, DiskError> {
    let remote_path = client.remote_dir().join(name)?;
    debug!(path = %remote_path, "Requesting upload link");

    let response = client
        .request(Method::GET, UPLOAD_ENDPOINT)?
        .query(&[("path", remote_path.as_str()), ("overwrite", "true")])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(client.api_error(response).await);
    }

    let link: UploadLink = response
        .json()
        .await
        .map_err(|e| DiskError::InvalidResponse(format!("upload link: {e}")))?;

    debug!(href = %link.href, "Upload link received");
    Ok(link)
}

/// Uploads a local file into the client's remote directory
///
/// The remote name is the base name of `local_path`. The file is opened
/// before any network traffic, so a missing local file never allocates an
/// upload link.
///
/// # Errors
/// - [`DiskError::IoError`] if the file cannot be opened
/// - [`DiskError::DomainError`] if the path has no usable file name
/// - any error from [`request_upload_link`]
/// - the class returned by [`classify_upload_status`] for a failed transfer
#[tracing::instrument(skip(client), fields(path = %local_path.display()))]
pub async fn upload_file(client: &DiskClient, local_path: &Path) -> Result<(), DiskError> {
    let name = file_name(local_path)?;

    let file = tokio::fs::File::open(local_path).await?;
    let size = file.metadata().await?.len();

    let link = request_upload_link(client, &name).await?;

    let response = client
        .http_client()
        .request(link.http_method(), &link.href)
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(Body::wrap_stream(ReaderStream::new(file)))
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        info!(name = %name, size, "File uploaded");
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify_upload_status(&name, status, body))
}

/// Maps a failed transfer status to its error class
///
/// | Status | Class |
/// |--------|-------|
/// | 413 | [`DiskError::FileTooLarge`] |
/// | 507 | [`DiskError::QuotaExceeded`] |
/// | other 5xx | [`DiskError::ServerError`] |
/// | anything else | [`DiskError::Unknown`] |
pub fn classify_upload_status(name: &str, status: StatusCode, body: String) -> DiskError {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => DiskError::FileTooLarge {
            name: name.to_string(),
        },
        StatusCode::INSUFFICIENT_STORAGE => DiskError::QuotaExceeded {
            name: name.to_string(),
        },
        s if s.is_server_error() => {
            let message = if body.trim().is_empty() {
                s.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            DiskError::ServerError {
                status: s.as_u16(),
                message,
            }
        }
        s => DiskError::Unknown {
            status: s.as_u16(),
            body,
        },
    }
}

fn file_name(local_path: &Path) -> Result<String, DiskError> {
    local_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ydsync_core::domain::DomainError::InvalidFileName(
                local_path.display().to_string(),
            )
            .into()
        })
}

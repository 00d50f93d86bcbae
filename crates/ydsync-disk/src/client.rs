//! Yandex Disk REST API client
//!
//! Provides a typed HTTP client for the `/v1/disk` API.
//! Handles the `OAuth` authorization header, the request timeout, endpoint
//! construction and extraction of server-supplied error messages.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ydsync_core::domain::RemoteDir;
//! use ydsync_disk::client::DiskClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dir = RemoteDir::new("disk:/Backup/")?;
//! let client = DiskClient::with_base_url("oauth-token", "https://cloud-api.yandex.net", dir)?;
//! let quota = client.get_quota().await?;
//! println!("{} bytes free", quota.free_space());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;
use ydsync_core::config::{ErrorMessageField, RemoteConfig};
use ydsync_core::domain::{DiskQuota, RemoteDir};

use crate::DiskError;

/// Endpoint for account information (quota)
pub(crate) const DISK_ENDPOINT: &str = "v1/disk/";

/// Endpoint for resource listing and deletion
pub(crate) const RESOURCES_ENDPOINT: &str = "v1/disk/resources";

/// Endpoint for requesting an upload link
pub(crate) const UPLOAD_ENDPOINT: &str = "v1/disk/resources/upload";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of entries requested from a listing
pub const DEFAULT_LIST_LIMIT: u32 = 10_000;

// ============================================================================
// API response types
// ============================================================================

/// Response from the `/v1/disk/` endpoint
#[derive(Debug, Deserialize)]
struct DiskInfoResponse {
    /// Total storage in bytes
    total_space: u64,
    /// Used storage in bytes
    used_space: u64,
}

// ============================================================================
// DiskClient
// ============================================================================

/// HTTP client for Yandex Disk API calls
///
/// Wraps `reqwest::Client` with the authorization header, a bounded request
/// timeout, and URL construction relative to the API root. Every instance is
/// scoped to one remote directory; all settings are fixed at construction.
#[derive(Debug, Clone)]
pub struct DiskClient {
    /// The underlying HTTP client (carries the request timeout)
    client: Client,
    /// API root, always ending with `/`
    base_url: Url,
    /// OAuth token sent as `Authorization: OAuth <token>`
    token: String,
    /// Remote directory all file operations are scoped to
    remote_dir: RemoteDir,
    /// Which error body key to read the server message from first
    message_field: ErrorMessageField,
    /// Maximum number of entries requested per listing
    list_limit: u32,
}

impl DiskClient {
    /// Creates a client from the `remote` configuration section
    ///
    /// # Errors
    /// Returns an error if the token is missing, the base URL or directory is
    /// invalid, or the HTTP client cannot be built
    pub fn from_config(config: &RemoteConfig) -> Result<Self, DiskError> {
        let token = config
            .token
            .clone()
            .ok_or_else(|| DiskError::InvalidResponse("no OAuth token configured".to_string()))?;
        let remote_dir = RemoteDir::new(config.directory.clone())?;

        Self::build(
            token,
            &config.base_url,
            remote_dir,
            config.request_timeout(),
            config.error_message_field,
            config.list_limit,
        )
    }

    /// Creates a client with default timeout and message field
    /// (useful for testing against a mock server)
    ///
    /// # Arguments
    /// * `token` - OAuth token
    /// * `base_url` - API root, e.g. `https://cloud-api.yandex.net`
    /// * `remote_dir` - Remote directory prefix
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: &str,
        remote_dir: RemoteDir,
    ) -> Result<Self, DiskError> {
        Self::build(
            token.into(),
            base_url,
            remote_dir,
            DEFAULT_TIMEOUT,
            ErrorMessageField::default(),
            DEFAULT_LIST_LIMIT,
        )
    }

    fn build(
        token: String,
        base_url: &str,
        remote_dir: RemoteDir,
        timeout: Duration,
        message_field: ErrorMessageField,
        list_limit: u32,
    ) -> Result<Self, DiskError> {
        let mut root = base_url.trim().to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let base_url = Url::parse(&root)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            token,
            remote_dir,
            message_field,
            list_limit,
        })
    }

    /// Sets which error body key is read first
    pub fn with_error_message_field(mut self, field: ErrorMessageField) -> Self {
        self.message_field = field;
        self
    }

    /// Sets the listing size bound
    pub fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = limit;
        self
    }

    /// Returns the remote directory this client is scoped to
    pub fn remote_dir(&self) -> &RemoteDir {
        &self.remote_dir
    }

    /// Returns the listing size bound
    pub fn list_limit(&self) -> u32 {
        self.list_limit
    }

    /// Returns the API root
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Creates an authenticated request builder for an endpoint
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `endpoint` - Path relative to the API root (e.g. `"v1/disk/resources"`)
    pub fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder, DiskError> {
        let url = self.base_url.join(endpoint)?;
        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("OAuth {}", self.token)))
    }

    /// Returns the underlying HTTP client
    ///
    /// Upload links are absolute, pre-signed URLs and are requested without
    /// the API root or the authorization header.
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    /// Retrieves account storage usage
    ///
    /// Makes `GET /v1/disk/`.
    pub async fn get_quota(&self) -> Result<DiskQuota, DiskError> {
        debug!("Fetching disk quota");

        let response = self.request(Method::GET, DISK_ENDPOINT)?.send().await?;
        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let info: DiskInfoResponse = response
            .json()
            .await
            .map_err(|e| DiskError::InvalidResponse(format!("disk info: {e}")))?;

        if info.total_space == 0 {
            warn!("Disk total_space is 0, this may indicate an API issue");
        }

        debug!(
            used = info.used_space,
            total = info.total_space,
            "Disk quota fetched"
        );
        Ok(DiskQuota {
            total_space: info.total_space,
            used_space: info.used_space,
        })
    }

    /// Converts a non-success response into [`DiskError::Api`] carrying the
    /// server-supplied message
    pub(crate) async fn api_error(&self, response: Response) -> DiskError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body, self.message_field, status);
        DiskError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Extracts the human-readable message from an API error body
///
/// Tries the preferred key, then the other one. A body that is not a JSON
/// object (or has neither key) is returned as-is; an empty body falls back to
/// the status' reason phrase.
pub fn server_message(body: &str, field: ErrorMessageField, status: StatusCode) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in [field.primary(), field.fallback()] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                if !text.is_empty() {
                    return text.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

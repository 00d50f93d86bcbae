//! Directory listing and deletion
//!
//! - [`list_files`] - Flat listing of the remote directory (files only)
//! - [`delete_file`] - Removes one file from the remote directory
//!
//! The listing requests only the fields the sync pass needs and is bounded by
//! the client's list limit; there is no pagination.

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use ydsync_core::domain::{into_listing, ModifiedAt, RemoteFileRecord, RemoteListing};

use crate::client::{DiskClient, RESOURCES_ENDPOINT};
use crate::DiskError;

/// Fields requested from the listing endpoint
const LIST_FIELDS: &str =
    "name,_embedded.items.name,_embedded.items.modified,_embedded.items.type";

/// Resource type value for folders
const DIR_TYPE: &str = "dir";

// ============================================================================
// API response types
// ============================================================================

/// Response from `GET /v1/disk/resources`
#[derive(Debug, Deserialize)]
struct ResourceResponse {
    /// Items of the requested directory; absent when `path` is a file
    #[serde(rename = "_embedded")]
    embedded: Option<ResourceList>,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

/// One entry of a directory listing
#[derive(Debug, Deserialize)]
struct ResourceItem {
    name: String,
    /// `"file"` or `"dir"`
    #[serde(rename = "type", default)]
    kind: Option<String>,
    modified: Option<String>,
}

// ============================================================================
// Operations
// ============================================================================

/// Lists the files directly inside the client's remote directory
///
/// Folders are skipped. Entries without a parseable `modified` timestamp are
/// skipped with a warning so a single odd entry cannot stall every pass.
///
/// # Errors
/// Returns [`DiskError::Api`] on a non-success status and
/// [`DiskError::InvalidResponse`] if the body is not a directory listing
#[tracing::instrument(skip(client), fields(dir = %client.remote_dir()))]
pub async fn list_files(client: &DiskClient) -> Result<RemoteListing, DiskError> {
    let limit = client.list_limit().to_string();
    let response = client
        .request(Method::GET, RESOURCES_ENDPOINT)?
        .query(&[
            ("path", client.remote_dir().as_str()),
            ("fields", LIST_FIELDS),
            ("limit", limit.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(client.api_error(response).await);
    }

    let body: ResourceResponse = response
        .json()
        .await
        .map_err(|e| DiskError::InvalidResponse(format!("resource listing: {e}")))?;

    let items = body
        .embedded
        .ok_or_else(|| {
            DiskError::InvalidResponse(format!(
                "{} is not a directory listing",
                client.remote_dir()
            ))
        })?
        .items;

    Ok(collect_files(items))
}

fn collect_files(items: Vec<ResourceItem>) -> RemoteListing {
    let listing = into_listing(items.into_iter().filter_map(to_record));
    debug!(count = listing.len(), "Remote listing collected");
    listing
}

fn to_record(item: ResourceItem) -> Option<RemoteFileRecord> {
    if item.kind.as_deref() == Some(DIR_TYPE) {
        debug!(name = %item.name, "Skipping remote folder");
        return None;
    }

    let Some(raw) = item.modified.as_deref() else {
        warn!(name = %item.name, "Remote entry has no modification time, skipping");
        return None;
    };

    match ModifiedAt::parse(raw) {
        Ok(modified_at) => Some(RemoteFileRecord {
            name: item.name,
            modified_at,
        }),
        Err(e) => {
            warn!(name = %item.name, error = %e, "Unparseable remote timestamp, skipping");
            None
        }
    }
}

/// Deletes a file from the client's remote directory
///
/// Makes `DELETE /v1/disk/resources?path=<dir><name>`. Only `204 No Content`
/// counts as success.
///
/// # Errors
/// Returns [`DiskError::DomainError`] for an invalid name and
/// [`DiskError::Api`] for any other status
#[tracing::instrument(skip(client))]
pub async fn delete_file(client: &DiskClient, name: &str) -> Result<(), DiskError> {
    let remote_path = client.remote_dir().join(name)?;

    let response = client
        .request(Method::DELETE, RESOURCES_ENDPOINT)?
        .query(&[("path", remote_path.as_str())])
        .send()
        .await?;

    if response.status() != StatusCode::NO_CONTENT {
        return Err(client.api_error(response).await);
    }

    debug!(path = %remote_path, "Remote file deleted");
    Ok(())
}

//! DiskStorageProvider - IRemoteStorage implementation for Yandex Disk
//!
//! Wraps the [`DiskClient`] and delegates to the [`resources`] and
//! [`upload`] modules to fulfil the [`IRemoteStorage`] port contract.
//!
//! ## Design Notes
//!
//! - The client is immutable after construction, so no locking is needed.
//! - Adapter errors ([`DiskError`](crate::DiskError)) are converted into the
//!   port-level [`StorageError`] at this boundary.
//! - Nothing is retried here; a failed file is picked up again by the next
//!   pass.

use std::path::Path;

use tracing::debug;
use ydsync_core::domain::{DiskQuota, RemoteListing};
use ydsync_core::ports::{IRemoteStorage, OperationOutcome, StorageError};

use crate::client::DiskClient;
use crate::{resources, upload};

/// Yandex Disk implementation of the [`IRemoteStorage`] port
#[derive(Debug, Clone)]
pub struct DiskStorageProvider {
    client: DiskClient,
}

impl DiskStorageProvider {
    /// Creates a provider around an existing client
    pub fn new(client: DiskClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client
    pub fn client(&self) -> &DiskClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IRemoteStorage for DiskStorageProvider {
    async fn get_quota(&self) -> Result<DiskQuota, StorageError> {
        Ok(self.client.get_quota().await?)
    }

    async fn list_files(&self) -> Result<RemoteListing, StorageError> {
        debug!(dir = %self.client.remote_dir(), "Listing remote directory");
        Ok(resources::list_files(&self.client).await?)
    }

    async fn upload(&self, local_path: &Path) -> Result<OperationOutcome, StorageError> {
        debug!(path = %local_path.display(), "Uploading file");
        upload::upload_file(&self.client, local_path).await?;
        Ok(OperationOutcome::Uploaded)
    }

    async fn delete(&self, file_name: &str) -> Result<OperationOutcome, StorageError> {
        debug!(name = %file_name, "Deleting remote file");
        resources::delete_file(&self.client, file_name).await?;
        Ok(OperationOutcome::Deleted)
    }
}

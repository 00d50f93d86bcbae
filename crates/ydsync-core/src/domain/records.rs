//! File listing records and the quota snapshot
//!
//! Records are rebuilt from scratch at the start of every pass; nothing here
//! is persisted. The remote listing itself is the only sync state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::newtypes::ModifiedAt;

/// Remote listing keyed by file name.
///
/// A `BTreeMap` keeps iteration order stable, which makes plans and logs
/// deterministic for a given pair of listings.
pub type RemoteListing = BTreeMap<String, ModifiedAt>;

/// A file directly inside the remote directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    /// File name (no directory component)
    pub name: String,
    /// Last modification time reported by the remote API
    pub modified_at: ModifiedAt,
}

/// A regular file directly inside the tracked local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileRecord {
    /// File name (no directory component)
    pub name: String,
    /// Absolute or tracked-directory-relative path used for uploads
    pub path: PathBuf,
    /// Modification time from filesystem metadata
    pub modified_at: ModifiedAt,
}

/// Account storage usage, used only for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskQuota {
    /// Total storage in bytes
    pub total_space: u64,
    /// Used storage in bytes
    pub used_space: u64,
}

impl DiskQuota {
    /// Remaining storage in bytes (zero if the account is over quota)
    #[must_use]
    pub fn free_space(&self) -> u64 {
        self.total_space.saturating_sub(self.used_space)
    }
}

/// Collects remote records into a [`RemoteListing`]
pub fn into_listing(records: impl IntoIterator<Item = RemoteFileRecord>) -> RemoteListing {
    records
        .into_iter()
        .map(|r| (r.name, r.modified_at))
        .collect()
}

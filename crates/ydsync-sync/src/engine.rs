//! One-way synchronization engine
//!
//! The [`SyncEngine`] mirrors the tracked local directory into a remote
//! directory. The local side is authoritative; the remote listing is the only
//! state and is re-read at the start of every pass.
//!
//! ## Sync Flow
//!
//! 1. **Snapshot**: list the remote directory, then the local directory
//! 2. **Plan**: compute a [`ReconciliationPlan`] from the two snapshots
//! 3. **Execute**: run the planned uploads and deletes, at most
//!    `max_concurrent` at a time, collecting per-file failures
//! 4. **Summary**: return a [`SyncResult`] and log a one-line summary
//!
//! ## Retry Logic
//!
//! There is none inside a pass. A failed file is still out of sync at the
//! next pass and is planned again from the fresh snapshot.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use ydsync_core::domain::{DiskQuota, LocalFileRecord, RemoteListing};
use ydsync_core::ports::{ILocalDirectory, IRemoteStorage, OperationOutcome, StorageError};

use crate::SyncError;

// ============================================================================
// ReconciliationPlan
// ============================================================================

/// Why a file is scheduled for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadReason {
    /// No remote file with that name exists
    New,
    /// The local copy was modified after the remote one
    Newer,
}

/// A single mutation decided by the reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Upload (or overwrite) a remote file from a local one
    Upload {
        /// File name inside both directories
        name: String,
        /// Local path to read from
        path: PathBuf,
        /// New file or newer local copy
        reason: UploadReason,
    },
    /// Delete a remote file with no local counterpart
    Delete {
        /// File name inside the remote directory
        name: String,
    },
}

impl PlannedAction {
    /// Name of the file the action targets
    pub fn name(&self) -> &str {
        match self {
            Self::Upload { name, .. } | Self::Delete { name } => name,
        }
    }
}

/// The full set of actions for one pass, computed before any mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    actions: Vec<PlannedAction>,
}

impl ReconciliationPlan {
    /// Computes the plan from a local and a remote snapshot
    ///
    /// Uploads of new files come first (in local order), followed by the
    /// reconcile pass over the remote listing (in remote order): remote-only
    /// files are deleted and files whose local modification time is strictly
    /// later than the remote one are uploaded again. Times are compared at
    /// whole-second granularity.
    ///
    /// Every name appears in at most one action.
    pub fn compute(local: &[LocalFileRecord], remote: &RemoteListing) -> Self {
        let mut actions = Vec::new();

        for file in local {
            if !remote.contains_key(&file.name) {
                actions.push(PlannedAction::Upload {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    reason: UploadReason::New,
                });
            }
        }

        let by_name: HashMap<&str, &LocalFileRecord> =
            local.iter().map(|f| (f.name.as_str(), f)).collect();

        for (name, remote_mtime) in remote {
            match by_name.get(name.as_str()) {
                None => actions.push(PlannedAction::Delete { name: name.clone() }),
                Some(file) if file.modified_at > *remote_mtime => {
                    actions.push(PlannedAction::Upload {
                        name: name.clone(),
                        path: file.path.clone(),
                        reason: UploadReason::Newer,
                    });
                }
                Some(_) => {}
            }
        }

        Self { actions }
    }

    /// Planned actions in execution order
    pub fn actions(&self) -> &[PlannedAction] {
        &self.actions
    }

    /// Consumes the plan, returning its actions
    pub fn into_actions(self) -> Vec<PlannedAction> {
        self.actions
    }

    /// Whether the directories are already in sync
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of planned uploads
    pub fn upload_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, PlannedAction::Upload { .. }))
            .count()
    }

    /// Number of planned deletions
    pub fn delete_count(&self) -> usize {
        self.actions.len() - self.upload_count()
    }
}

// ============================================================================
// SyncResult
// ============================================================================

/// Summary of a completed synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Number of files uploaded successfully
    pub files_uploaded: u32,
    /// Number of remote files deleted successfully
    pub files_deleted: u32,
    /// Per-file failures (non-fatal)
    pub errors: Vec<String>,
    /// Wall-clock duration of the pass in milliseconds
    pub duration_ms: u64,
}

impl SyncResult {
    /// Number of planned actions that failed
    pub fn files_failed(&self) -> usize {
        self.errors.len()
    }

    /// Whether every planned action succeeded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Default number of actions executed at once
pub const DEFAULT_MAX_CONCURRENT: usize = 1;

/// One-way synchronization engine
///
/// ## Dependencies
///
/// - `remote_storage`: listing, uploads and deletions in the remote directory
/// - `local_directory`: flat listing of the tracked directory
pub struct SyncEngine {
    remote_storage: Arc<dyn IRemoteStorage>,
    local_directory: Arc<dyn ILocalDirectory>,
    /// Upper bound on actions running at once, never zero
    max_concurrent: usize,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` executing one action at a time
    ///
    /// # Arguments
    /// * `remote_storage` - Remote directory operations (IRemoteStorage)
    /// * `local_directory` - Local directory listing (ILocalDirectory)
    pub fn new(
        remote_storage: Arc<dyn IRemoteStorage>,
        local_directory: Arc<dyn ILocalDirectory>,
    ) -> Self {
        Self {
            remote_storage,
            local_directory,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Sets how many planned actions may run at once (values below 1 are
    /// treated as 1)
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Returns the concurrency bound
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Fetches and logs the account quota
    ///
    /// Failures are logged and swallowed; the quota is informational.
    pub async fn report_quota(&self) -> Option<DiskQuota> {
        match self.remote_storage.get_quota().await {
            Ok(quota) => {
                info!(
                    total = quota.total_space,
                    used = quota.used_space,
                    free = quota.free_space(),
                    "Remote storage quota"
                );
                Some(quota)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch storage quota");
                None
            }
        }
    }

    /// Performs one synchronization pass for `local_dir`
    ///
    /// # Returns
    /// A [`SyncResult`] summarizing the pass. Per-file failures are included
    /// in [`SyncResult::errors`] and do not abort the pass.
    ///
    /// # Errors
    /// - [`SyncError::RemoteListFailed`] if the remote listing fails; nothing
    ///   is changed
    /// - [`SyncError::TrackedDirectoryMissing`] if `local_dir` cannot be read
    #[tracing::instrument(skip(self), fields(dir = %local_dir.display()))]
    pub async fn run(&self, local_dir: &Path) -> Result<SyncResult, SyncError> {
        let start = Instant::now();
        info!("Starting sync pass");

        let remote = self
            .remote_storage
            .list_files()
            .await
            .map_err(SyncError::RemoteListFailed)?;

        let local = self
            .local_directory
            .list_files(local_dir)
            .await
            .map_err(|source| SyncError::TrackedDirectoryMissing {
                path: local_dir.to_path_buf(),
                source,
            })?;

        debug!(
            local = local.len(),
            remote = remote.len(),
            "Snapshots taken"
        );

        let plan = ReconciliationPlan::compute(&local, &remote);
        debug!(
            uploads = plan.upload_count(),
            deletes = plan.delete_count(),
            "Reconciliation plan computed"
        );

        let mut result = self.execute(plan).await;
        result.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            uploaded = result.files_uploaded,
            deleted = result.files_deleted,
            failed = result.files_failed(),
            duration_ms = result.duration_ms,
            "Sync pass completed"
        );

        Ok(result)
    }

    /// Executes every planned action, bounded by `max_concurrent`
    async fn execute(&self, plan: ReconciliationPlan) -> SyncResult {
        let mut result = SyncResult::default();
        if plan.is_empty() {
            return result;
        }

        let outcomes: Vec<(PlannedAction, Result<OperationOutcome, StorageError>)> =
            stream::iter(plan.into_actions())
                .map(|action| async move {
                    let outcome = self.apply(&action).await;
                    (action, outcome)
                })
                .buffer_unordered(self.max_concurrent)
                .collect()
                .await;

        for (action, outcome) in outcomes {
            match outcome {
                Ok(OperationOutcome::Uploaded) => result.files_uploaded += 1,
                Ok(OperationOutcome::Deleted) => result.files_deleted += 1,
                Err(e) => {
                    let msg = match &action {
                        PlannedAction::Upload { name, .. } => {
                            format!("Failed to upload {name}: {e}")
                        }
                        PlannedAction::Delete { name } => format!("Failed to delete {name}: {e}"),
                    };
                    warn!(transient = e.is_transient(), "{}", msg);
                    result.errors.push(msg);
                }
            }
        }

        result
    }

    async fn apply(&self, action: &PlannedAction) -> Result<OperationOutcome, StorageError> {
        match action {
            PlannedAction::Upload { name, path, reason } => {
                let outcome = self.remote_storage.upload(path).await?;
                match reason {
                    UploadReason::New => info!(name = %name, "Uploaded new file"),
                    UploadReason::Newer => info!(name = %name, "Uploaded modified file"),
                }
                Ok(outcome)
            }
            PlannedAction::Delete { name } => {
                let outcome = self.remote_storage.delete(name).await?;
                info!(name = %name, "Deleted remote file");
                Ok(outcome)
            }
        }
    }
}

//! Local directory adapter (secondary/driven adapter)
//!
//! Implements [`ILocalDirectory`] using `tokio::fs`.
//!
//! ## Design Decisions
//!
//! - **Flat**: only direct children are read; subdirectories are skipped.
//! - **Symlinks are followed**: a link to a regular file is listed under the
//!   link's name with the target's modification time. Dangling links are
//!   skipped.
//! - **Races**: an entry removed between `read_dir` and its metadata read is
//!   skipped, not reported.
//! - **Per-entry failures**: only a failure to read the directory itself is
//!   an error. An entry whose metadata cannot be read (symlink loop, link
//!   into a protected directory) is logged and skipped.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, instrument, warn};
use ydsync_core::domain::{LocalFileRecord, ModifiedAt};
use ydsync_core::ports::ILocalDirectory;

/// Adapter that bridges the [`ILocalDirectory`] port to the real filesystem.
///
/// Zero-sized: the tracked directory is passed to every call.
#[derive(Debug, Clone, Default)]
pub struct LocalDirectoryAdapter;

impl LocalDirectoryAdapter {
    /// Create a new `LocalDirectoryAdapter`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ILocalDirectory for LocalDirectoryAdapter {
    #[instrument(skip(self), fields(dir = %dir.display()))]
    async fn list_files(&self, dir: &Path) -> std::io::Result<Vec<LocalFileRecord>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };

            // follows symlinks
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(name = %name, "Entry vanished or dangling link, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "Cannot read entry metadata, skipping");
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let modified_at = match metadata.modified() {
                Ok(time) => ModifiedAt::from_system_time(time),
                Err(e) => {
                    warn!(name = %name, error = %e, "Cannot read modification time, skipping");
                    continue;
                }
            };
            files.push(LocalFileRecord {
                name,
                path,
                modified_at,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = files.len(), "Local directory listed");
        Ok(files)
    }
}

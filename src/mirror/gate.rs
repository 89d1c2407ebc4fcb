//! Cache gate: skip the network when a repository is already mirrored, and
//! recover once from a mirror that fails to load.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use super::HubMirror;
use super::planner::join_relative;
use crate::telemetry;
use crate::types::{RemoteRepository, RequiredFileSet};
use crate::{HuginnError, Result};

impl HubMirror {
    /// Sync `repository` unless its local directory already exists.
    ///
    /// Presence of the directory is the only check; a partially populated
    /// directory is caught by [`HubMirror::load_with`].
    pub async fn ensure(
        &self,
        repository: &RemoteRepository,
        required: &RequiredFileSet,
    ) -> Result<PathBuf> {
        let root = self.repository_dir(repository)?;
        if fs::try_exists(&root).await? {
            debug!(repository = %repository, root = %root.display(), "already mirrored");
            return Ok(root);
        }
        self.sync(repository, required).await?;
        Ok(root)
    }

    /// Ensure the repository, then hand its directory to `loader`.
    ///
    /// If the loader fails, the local directory is deleted, synced again and
    /// the loader runs exactly once more; its second result is returned.
    pub async fn load_with<T, F>(
        &self,
        repository: &RemoteRepository,
        required: &RequiredFileSet,
        mut loader: F,
    ) -> Result<T>
    where
        F: FnMut(&Path) -> Result<T>,
    {
        let root = self.ensure(repository, required).await?;
        match loader(&root) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(
                    repository = %repository,
                    error = %error,
                    "load failed, clearing cache and downloading again"
                );
                metrics::counter!(telemetry::CACHE_HEALS_TOTAL).increment(1);
                self.clear(repository).await?;
                self.sync(repository, required).await?;
                loader(&root)
            }
        }
    }

    /// Delete the local directory of `repository`. Returns whether anything
    /// was removed.
    pub async fn clear(&self, repository: &RemoteRepository) -> Result<bool> {
        let root = self.repository_dir(repository)?;
        match fs::remove_dir_all(&root).await {
            Ok(()) => {
                info!(repository = %repository, root = %root.display(), "cleared");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Check that every required member exists under `root` and that required
/// bundle directories are not empty.
pub fn verify_required(root: &Path, required: &RequiredFileSet) -> Result<()> {
    for member in required.iter() {
        let path = join_relative(root, member);
        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HuginnError::FileNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() && std::fs::read_dir(&path)?.next().is_none() {
            return Err(HuginnError::CorruptBundle {
                path,
                reason: "bundle directory is empty".to_string(),
            });
        }
    }
    Ok(())
}

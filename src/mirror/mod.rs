//! Repository mirroring: tree walking, sync planning and the cache gate.

mod builder;
pub mod endpoint;
mod gate;
pub mod planner;
pub mod tree;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use builder::{Huginn, HuginnBuilder};
pub use endpoint::HubEndpoint;
pub use gate::verify_required;
pub use planner::{PlanStep, PlannedBundle, PlannedFile, SyncPlan, SyncPlanner};
pub use tree::TreeWalker;

use crate::cancel::CancellationFlag;
use crate::transfer::{TransferClient, TransferOutcome};
use crate::types::{DownloadTask, RemoteRepository, RequiredFileSet};
use crate::{HuginnError, Result};
use planner::{is_safe_relative, join_relative};

/// What a [`HubMirror::sync`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Local repository directory.
    pub root: PathBuf,
    /// Destinations written by this sync.
    pub downloaded: Vec<PathBuf>,
    /// Files that were already complete on disk.
    pub already_present: usize,
    /// Root-level remote paths the planner did not select.
    pub skipped: Vec<String>,
    /// Bytes received over the network.
    pub bytes: u64,
}

/// Mirrors remote repositories into a local cache directory.
///
/// Created through [`Huginn::builder`].
#[derive(Clone)]
pub struct HubMirror {
    transfer: TransferClient,
    walker: TreeWalker,
    planner: SyncPlanner,
    endpoint: HubEndpoint,
    base_dir: PathBuf,
    cancel: CancellationFlag,
}

impl HubMirror {
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn endpoint(&self) -> &HubEndpoint {
        &self.endpoint
    }

    /// Handle to this mirror's cancellation flag.
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// `<base_dir>/<folder_name>`
    ///
    /// The folder name must be a single path segment; anything that could
    /// resolve outside `base_dir` is a `Configuration` error.
    pub fn repository_dir(&self, repository: &RemoteRepository) -> Result<PathBuf> {
        let name = repository.folder_name.as_str();
        if !is_safe_relative(name) || name.contains('/') {
            return Err(HuginnError::Configuration(format!(
                "invalid folder name {name:?}"
            )));
        }
        Ok(self.base_dir.join(name))
    }

    /// Download every planned file of `repository` that is not already on
    /// disk. Transfers run one at a time.
    pub async fn sync(
        &self,
        repository: &RemoteRepository,
        required: &RequiredFileSet,
    ) -> Result<SyncReport> {
        let root = self.repository_dir(repository)?;
        info!(
            repository = %repository,
            variant = repository.variant.as_deref().unwrap_or("-"),
            root = %root.display(),
            required = required.len(),
            "syncing repository"
        );
        self.cancel.check()?;

        let entries = self.walker.list_entries(repository, "").await?;
        let plan = self.planner.plan(&entries, required, &root);

        let mut report = SyncReport {
            root,
            skipped: plan.skipped,
            ..SyncReport::default()
        };

        for step in plan.steps {
            self.cancel.check()?;
            match step {
                PlanStep::File(file) => self.fetch(repository, file, &mut report).await?,
                PlanStep::Bundle(bundle) => {
                    self.fetch_bundle(repository, &bundle, &mut report).await?
                }
            }
        }
        // The root exists after any successful sync, even an empty one.
        tokio::fs::create_dir_all(&report.root).await?;

        info!(
            repository = %repository,
            downloaded = report.downloaded.len(),
            already_present = report.already_present,
            bytes = report.bytes,
            "repository synced"
        );
        Ok(report)
    }

    async fn fetch_bundle(
        &self,
        repository: &RemoteRepository,
        bundle: &PlannedBundle,
        report: &mut SyncReport,
    ) -> Result<()> {
        debug!(
            path = %bundle.remote_path,
            local_root = %bundle.local_root.display(),
            "fetching bundle"
        );
        let mut pending = vec![bundle.remote_path.clone()];

        while let Some(directory) = pending.pop() {
            self.cancel.check()?;
            let children = self.walker.list_entries(repository, &directory).await?;

            for child in children {
                let relative = child
                    .path
                    .strip_prefix(bundle.remote_path.as_str())
                    .and_then(|rest| rest.strip_prefix('/'))
                    .filter(|rest| is_safe_relative(rest));
                let Some(relative) = relative else {
                    warn!(path = %child.path, bundle = %bundle.remote_path, "ignoring entry outside bundle");
                    continue;
                };

                if child.is_directory() {
                    pending.push(child.path.clone());
                } else {
                    let file = PlannedFile {
                        destination: join_relative(&bundle.local_root, relative),
                        remote_path: child.path.clone(),
                        size: child.effective_size(),
                    };
                    self.fetch(repository, file, report).await?;
                }
            }
        }
        Ok(())
    }

    async fn fetch(
        &self,
        repository: &RemoteRepository,
        file: PlannedFile,
        report: &mut SyncReport,
    ) -> Result<()> {
        let url = self.endpoint.resolve_url(repository, &file.remote_path);
        let task = DownloadTask::new(file.remote_path, url, file.size, file.destination);

        match self.transfer.download(&task, &self.cancel).await {
            Ok(TransferOutcome::AlreadyPresent) => report.already_present += 1,
            Ok(TransferOutcome::Downloaded { bytes, .. }) => {
                report.bytes += bytes;
                report.downloaded.push(task.destination);
            }
            Err(HuginnError::Cancelled) => return Err(HuginnError::Cancelled),
            Err(source) => {
                return Err(HuginnError::File {
                    repository: repository.namespace.clone(),
                    path: task.remote_path,
                    source: Box::new(source),
                });
            }
        }
        Ok(())
    }
}

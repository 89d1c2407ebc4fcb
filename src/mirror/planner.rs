//! Selecting which remote entries to mirror, and where.
//!
//! Two kinds of entries are ever fetched:
//!
//! - **bundles**: directories with a recognised suffix (`.mlmodelc`, ...)
//!   named by the required-file set, either bare (`Seg.mlmodelc`, placed at
//!   the repository root) or behind a variant folder (`v2/Seg.mlmodelc`,
//!   placed under `v2/`);
//! - **essential files**: small metadata files (`*.json`, `*.txt`) that every
//!   consumer needs.
//!
//! Everything else in the listing is skipped.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::{RemoteEntry, RequiredFileSet};

/// Directory suffixes treated as model bundles by default.
pub const DEFAULT_BUNDLE_SUFFIXES: &[&str] = &[".mlmodelc", ".mlpackage"];

/// A single file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub remote_path: String,
    pub size: u64,
    pub destination: PathBuf,
}

/// A bundle directory to fetch recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBundle {
    pub remote_path: String,
    /// Local directory the bundle's contents land in.
    pub local_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    File(PlannedFile),
    Bundle(PlannedBundle),
}

/// Output of [`SyncPlanner::plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub steps: Vec<PlanStep>,
    /// Remote paths that were listed but not selected.
    pub skipped: Vec<String>,
}

/// Decides which listed entries a consumer needs.
#[derive(Debug, Clone)]
pub struct SyncPlanner {
    bundle_suffixes: Vec<String>,
}

impl Default for SyncPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_BUNDLE_SUFFIXES.iter().map(|s| s.to_string()))
    }
}

impl SyncPlanner {
    pub fn new(bundle_suffixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            bundle_suffixes: bundle_suffixes.into_iter().collect(),
        }
    }

    pub fn is_bundle(&self, path: &str) -> bool {
        self.bundle_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
    }

    /// Plan the root listing of a repository mirrored at `local_root`.
    pub fn plan(
        &self,
        entries: &[RemoteEntry],
        required: &RequiredFileSet,
        local_root: &Path,
    ) -> SyncPlan {
        let mut plan = SyncPlan::default();

        for entry in entries {
            if !is_safe_relative(&entry.path) {
                warn!(path = %entry.path, "ignoring entry with unsafe path");
                plan.skipped.push(entry.path.clone());
                continue;
            }

            if entry.is_directory() {
                let bundles = self.bundle_steps(entry, required, local_root);
                if bundles.is_empty() {
                    debug!(path = %entry.path, "directory not required, skipping");
                    plan.skipped.push(entry.path.clone());
                }
                plan.steps.extend(bundles.into_iter().map(PlanStep::Bundle));
            } else if is_essential(&entry.path) {
                plan.steps.push(PlanStep::File(PlannedFile {
                    remote_path: entry.path.clone(),
                    size: entry.effective_size(),
                    destination: join_relative(local_root, &entry.path),
                }));
            } else {
                debug!(path = %entry.path, "not an essential file, skipping");
                plan.skipped.push(entry.path.clone());
            }
        }

        plan
    }

    fn bundle_steps(
        &self,
        entry: &RemoteEntry,
        required: &RequiredFileSet,
        local_root: &Path,
    ) -> Vec<PlannedBundle> {
        if !self.is_bundle(&entry.path) {
            return Vec::new();
        }

        let mut roots: Vec<PathBuf> = Vec::new();
        if required.contains(&entry.path) {
            roots.push(join_relative(local_root, &entry.path));
        }
        for subfolder in required.subfolders_for(&entry.path) {
            let root = join_relative(&local_root.join(subfolder), &entry.path);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        roots
            .into_iter()
            .map(|local_root| PlannedBundle {
                remote_path: entry.path.clone(),
                local_root,
            })
            .collect()
    }
}

/// Small metadata files fetched regardless of variant.
pub fn is_essential(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name == "config.json" || name.ends_with(".json") || name.ends_with(".txt")
}

/// Relative, `/`-separated, with no empty, `.` or `..` segments.
pub fn is_safe_relative(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Join a `/`-separated relative path onto `base` segment by segment.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

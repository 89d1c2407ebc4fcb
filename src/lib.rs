//! Huginn - resumable mirror for model repositories on HuggingFace-style hubs
//!
//! This crate walks a remote repository's file tree, selects only the files a
//! consumer needs, downloads them with resume and retry, and installs each one
//! atomically into a local cache directory. Once a repository is mirrored,
//! later runs never touch the network.
//!
//! # Sync Example
//!
//! ```rust,no_run
//! use huginn::{Huginn, RemoteRepository, RequiredFileSet};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let mirror = Huginn::builder()
//!         .base_dir("/tmp/models")
//!         .build()?;
//!
//!     let repo = RemoteRepository::new("FluidInference/speaker-diarization-coreml");
//!     let required: RequiredFileSet = ["v2/Segmentation.mlmodelc"].into_iter().collect();
//!
//!     let report = mirror.sync(&repo, &required).await?;
//!     println!("{} files, {} bytes", report.downloaded.len(), report.bytes);
//!     Ok(())
//! }
//! ```
//!
//! # Load Example
//!
//! ```rust,no_run
//! use huginn::{Huginn, RemoteRepository, RequiredFileSet, verify_required};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let mirror = Huginn::builder().build()?;
//!     let repo = RemoteRepository::new("owner/model");
//!     let required: RequiredFileSet = ["config.json", "Encoder.mlmodelc"].into_iter().collect();
//!
//!     // A failed load wipes the mirror and downloads it again, once.
//!     let root = mirror
//!         .load_with(&repo, &required, |root| {
//!             verify_required(root, &required)?;
//!             Ok(root.to_path_buf())
//!         })
//!         .await?;
//!
//!     println!("ready at {}", root.display());
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod mirror;
pub mod telemetry;
pub mod transfer;
pub mod transport;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use cancel::CancellationFlag;
pub use config::HuginnConfig;
pub use error::{HuginnError, Result};
pub use mirror::{
    HubEndpoint, HubMirror, Huginn, HuginnBuilder, PlanStep, SyncPlan, SyncPlanner, SyncReport,
    TreeWalker, verify_required,
};
pub use transfer::{RetryConfig, TransferClient, TransferOutcome};
pub use transport::{FetchRequest, FetchResponse, HttpTransport, Transport, TransportConfig};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION};

// Re-export all types
pub use types::{
    DownloadTask, EntryKind, LfsInfo, RemoteEntry, RemoteRepository, RequiredFileSet,
};

//! Public types for the Huginn API.

mod entry;
mod repository;
mod required;
mod task;

pub use entry::{EntryKind, LfsInfo, RemoteEntry};
pub use repository::RemoteRepository;
pub use required::RequiredFileSet;
pub use task::{DownloadTask, PARTIAL_SUFFIX, partial_path};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to a destination path while its download is incomplete.
pub const PARTIAL_SUFFIX: &str = ".download";

/// One file transfer: where it comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Path inside the remote repository.
    pub remote_path: String,
    /// Resolved download URL.
    pub url: String,
    /// Expected size in bytes, from the tree listing.
    pub expected_size: u64,
    /// Final location on disk.
    pub destination: PathBuf,
}

impl DownloadTask {
    pub fn new(
        remote_path: impl Into<String>,
        url: impl Into<String>,
        expected_size: u64,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            remote_path: remote_path.into(),
            url: url.into(),
            expected_size,
            destination: destination.into(),
        }
    }

    /// `destination + ".download"`.
    pub fn temp_path(&self) -> PathBuf {
        partial_path(&self.destination)
    }

    /// Byte length of an existing partial download, or 0.
    pub fn resume_offset(&self) -> u64 {
        file_len(&self.temp_path()).unwrap_or(0)
    }

    /// Whether the destination already holds a file of the expected size.
    pub fn is_complete(&self) -> bool {
        file_len(&self.destination) == Some(self.expected_size)
    }
}

/// Append [`PARTIAL_SUFFIX`] to a path without touching its extension.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name: OsString = destination.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Length of a regular file, `None` if it is missing or not a file.
pub(crate) fn file_len(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

//! Moving finished downloads into place.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{HuginnError, Result};

/// Move `temp` to `destination`, replacing whatever is there.
///
/// Falls back to copy + delete when the rename is refused, which happens in
/// sandboxes that forbid cross-directory moves.
pub fn install(temp: &Path, destination: &Path) -> Result<()> {
    install_with(temp, destination, |from, to| std::fs::rename(from, to))
}

/// [`install`] on the blocking thread pool, for callers on the async runtime.
pub async fn install_blocking(temp: PathBuf, destination: PathBuf) -> Result<()> {
    let path = destination.clone();
    tokio::task::spawn_blocking(move || install(&temp, &destination))
        .await
        .map_err(|e| HuginnError::Install {
            path,
            source: io::Error::other(e),
        })?
}

/// [`install`] with a caller-supplied rename primitive.
pub fn install_with<R>(temp: &Path, destination: &Path, rename: R) -> Result<()>
where
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let install_err = |source| HuginnError::Install {
        path: destination.to_path_buf(),
        source,
    };

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(install_err)?;
    }

    match std::fs::remove_file(destination) {
        Ok(()) => debug!(path = %destination.display(), "removed stale file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %destination.display(), error = %e, "could not remove stale file"),
    }

    match rename(temp, destination) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(
                from = %temp.display(),
                to = %destination.display(),
                error = %e,
                "rename refused, falling back to copy"
            );
            std::fs::copy(temp, destination).map_err(install_err)?;
            if let Err(e) = std::fs::remove_file(temp) {
                warn!(path = %temp.display(), error = %e, "could not remove temp file after copy");
            }
            Ok(())
        }
    }
}

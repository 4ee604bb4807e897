use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::InstallError;

const WORKDIR_PREFIX: &str = "gpip-";

/// Scoped temporary directory for one install.
///
/// Removed on drop unless it was created with `keep`, in which case the
/// directory outlives the process for inspection.
#[derive(Debug)]
pub struct WorkDir {
    dir: Option<TempDir>,
    path: PathBuf,
    keep: bool,
}

impl WorkDir {
    /// Creates a fresh, unique directory under the system temp root.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created.
    pub fn create(keep: bool) -> Result<Self, InstallError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKDIR_PREFIX)
            .tempdir()
            .map_err(|source| InstallError::Io {
                context: "failed to create a temporary working directory".to_string(),
                source,
            })?;
        let path = dir.path().to_path_buf();
        debug!(workdir = %path.display(), keep, "created working directory");
        Ok(Self {
            dir: Some(dir),
            path,
            keep,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Path to report back once the install is over; `None` when the directory
    /// is going away.
    #[must_use]
    pub fn retained_path(&self) -> Option<PathBuf> {
        self.keep.then(|| self.path.clone())
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        if self.keep {
            let path = dir.keep();
            info!(workdir = %path.display(), "kept working directory");
        } else if let Err(err) = dir.close() {
            debug!(workdir = %self.path.display(), %err, "failed to remove working directory");
        }
    }
}

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs4::FileExt;
use tracing::{debug, trace};

/// Exclusive advisory lock on one cached repository. Released on drop.
pub(super) struct RepoLock {
    file: File,
    path: PathBuf,
}

impl RepoLock {
    pub(super) fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create lock directory {}", parent.display())
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open lock {}", path.display()))?;
        if file.try_lock_exclusive().is_err() {
            debug!(lock = %path.display(), "waiting for another run to release the cache");
            file.lock_exclusive()
                .with_context(|| format!("failed to lock {}", path.display()))?;
        }
        trace!(lock = %path.display(), "cache lock acquired");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RepoLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        trace!(lock = %self.path.display(), "cache lock released");
    }
}

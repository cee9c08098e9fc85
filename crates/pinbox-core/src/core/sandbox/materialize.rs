use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pinbox_domain::Dependency;
use tracing::debug;

use super::errors::SandboxError;
use super::lock::RepoLock;
use super::SandboxBuilder;
use crate::core::fs::remove_dir_all_writable;

impl SandboxBuilder<'_> {
    /// Ensure `dep` is checked out at exactly its pinned revision and return
    /// the root to put on the search path.
    ///
    /// The clone is reused across runs; fetch and checkout run every time so
    /// a stale cache or a tampered working copy is corrected.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Clone`], [`SandboxError::Fetch`] or
    /// [`SandboxError::Checkout`] for the failing step. Nothing is retried.
    pub fn materialize(&self, dep: &Dependency) -> Result<PathBuf, SandboxError> {
        let _lock = self.lock(dep)?;
        let repo_path = dep.repo_path(&self.spool);

        if self.vcs.clone_exists(&repo_path) {
            debug!(import_path = %dep.import_path, repo = %repo_path.display(), "repo cache hit");
        } else {
            debug!(
                import_path = %dep.import_path,
                remote = %dep.remote,
                vcs = %dep.vcs,
                "cloning repo"
            );
            self.clone_repo(dep, &repo_path)
                .map_err(|err| SandboxError::clone_failed(dep, &err))?;
        }

        self.vcs
            .fetch(dep, &repo_path)
            .map_err(|err| SandboxError::fetch_failed(dep, &err))?;

        let workdir = dep.workdir_root(&self.spool);
        self.vcs
            .checkout(dep, &workdir, &repo_path)
            .map_err(|err| SandboxError::checkout_failed(dep, &err))?;
        debug!(
            import_path = %dep.import_path,
            rev = %dep.rev,
            workdir = %workdir.display(),
            "checked out"
        );

        Ok(dep.sandbox_root(&self.spool))
    }

    fn lock(&self, dep: &Dependency) -> Result<Option<RepoLock>, SandboxError> {
        if !self.locking {
            return Ok(None);
        }
        let path = dep.lock_path(&self.spool);
        RepoLock::acquire(&path)
            .map(Some)
            .map_err(|err| SandboxError::CacheLock {
                import_path: dep.import_path.clone(),
                lock: path,
                cause: format!("{err:#}"),
            })
    }

    /// Clone into a sibling `.partial` directory and rename it into place,
    /// so an interrupted clone never looks like a usable cache entry.
    fn clone_repo(&self, dep: &Dependency, repo_path: &Path) -> Result<()> {
        if let Some(parent) = repo_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let partial = repo_path.with_extension("partial");
        remove_dir_all_writable(&partial)?;
        if let Err(err) = self.vcs.create_repo(dep, &partial) {
            let _ = remove_dir_all_writable(&partial);
            return Err(err);
        }
        fs::rename(&partial, repo_path).with_context(|| {
            format!(
                "failed to move {} into {}",
                partial.display(),
                repo_path.display()
            )
        })?;
        Ok(())
    }
}

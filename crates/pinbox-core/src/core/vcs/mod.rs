//! Version-control adapters.
//!
//! The sandbox only ever talks to [`VcsAdapter`]; which system backs a
//! dependency is decided here from [`VcsKind`].

mod git;
mod hg;
#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

use anyhow::Result;
use pinbox_domain::{Dependency, VcsKind};
use tracing::trace;

use crate::process::run_command;

pub trait VcsAdapter: Send + Sync {
    /// Whether a usable clone already exists at `repo_path`.
    fn clone_exists(&self, repo_path: &Path) -> bool;
    /// Full clone of `dep.remote` into `repo_path`.
    fn create_repo(&self, dep: &Dependency, repo_path: &Path) -> Result<()>;
    /// Pull every ref needed to resolve `dep.rev` into the cached clone.
    fn fetch(&self, dep: &Dependency, repo_path: &Path) -> Result<()>;
    /// Make `workdir_root` contain exactly the tree at `dep.rev`.
    fn checkout(&self, dep: &Dependency, workdir_root: &Path, repo_path: &Path) -> Result<()>;
}

#[derive(Debug, thiserror::Error)]
#[error("`{program} {args}` exited with status {code}: {stderr}")]
pub(crate) struct VcsCommandError {
    pub(crate) program: String,
    pub(crate) args: String,
    pub(crate) code: i32,
    pub(crate) stderr: String,
}

/// Adapter backed by the `git` and `hg` executables on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemVcs {
    git: String,
    hg: String,
}

impl SystemVcs {
    #[must_use]
    pub fn new() -> Self {
        Self {
            git: "git".to_string(),
            hg: "hg".to_string(),
        }
    }

    fn program(&self, kind: VcsKind) -> &str {
        match kind {
            VcsKind::Git => &self.git,
            VcsKind::Hg => &self.hg,
        }
    }
}

impl Default for SystemVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsAdapter for SystemVcs {
    fn clone_exists(&self, repo_path: &Path) -> bool {
        repo_path.is_dir()
    }

    fn create_repo(&self, dep: &Dependency, repo_path: &Path) -> Result<()> {
        let program = self.program(dep.vcs);
        match dep.vcs {
            VcsKind::Git => git::clone(program, &dep.remote, repo_path),
            VcsKind::Hg => hg::clone(program, &dep.remote, repo_path),
        }
    }

    fn fetch(&self, dep: &Dependency, repo_path: &Path) -> Result<()> {
        let program = self.program(dep.vcs);
        match dep.vcs {
            VcsKind::Git => git::fetch(program, &dep.remote, repo_path),
            VcsKind::Hg => hg::fetch(program, repo_path),
        }
    }

    fn checkout(&self, dep: &Dependency, workdir_root: &Path, repo_path: &Path) -> Result<()> {
        let program = self.program(dep.vcs);
        match dep.vcs {
            VcsKind::Git => git::checkout(program, &dep.rev, workdir_root, repo_path),
            VcsKind::Hg => hg::checkout(program, &dep.rev, workdir_root, repo_path),
        }
    }
}

/// Run one VCS command and return its stdout, turning a non-zero exit into
/// [`VcsCommandError`].
pub(crate) fn run_vcs(
    program: &str,
    args: &[String],
    envs: &[(String, String)],
    cwd: Option<&Path>,
) -> Result<String> {
    trace!(%program, args = %args.join(" "), "vcs command");
    let output = run_command(program, args, envs, cwd)?;
    if !output.success() {
        return Err(VcsCommandError {
            program: program.to_string(),
            args: args.join(" "),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        }
        .into());
    }
    Ok(output.stdout)
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

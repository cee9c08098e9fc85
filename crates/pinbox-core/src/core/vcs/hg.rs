use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::{path_arg, run_vcs};
use crate::core::fs::remove_dir_all_writable;

pub(super) fn clone(hg: &str, remote: &str, repo_path: &Path) -> Result<()> {
    run_vcs(
        hg,
        &[
            "clone".to_string(),
            "-U".to_string(),
            "-q".to_string(),
            "--".to_string(),
            remote.to_string(),
            path_arg(repo_path),
        ],
        &[],
        None,
    )?;
    Ok(())
}

pub(super) fn fetch(hg: &str, repo_path: &Path) -> Result<()> {
    run_vcs(
        hg,
        &[
            "pull".to_string(),
            "-q".to_string(),
            "-R".to_string(),
            path_arg(repo_path),
        ],
        &[],
        None,
    )?;
    Ok(())
}

/// `hg archive` refuses to write into a populated directory, so the working
/// copy is rebuilt from scratch every time.
pub(super) fn checkout(hg: &str, rev: &str, workdir_root: &Path, repo_path: &Path) -> Result<()> {
    remove_dir_all_writable(workdir_root)?;
    if let Some(parent) = workdir_root.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    run_vcs(
        hg,
        &[
            "archive".to_string(),
            "-q".to_string(),
            "--config".to_string(),
            "ui.archivemeta=false".to_string(),
            "-R".to_string(),
            path_arg(repo_path),
            "-r".to_string(),
            rev.to_string(),
            "-t".to_string(),
            "files".to_string(),
            path_arg(workdir_root),
        ],
        &[],
        None,
    )?;
    Ok(())
}

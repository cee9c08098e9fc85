use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pinbox_domain::digest_key;

use super::{path_arg, run_vcs};

/// Directory inside the bare clone holding one index file per working copy.
/// Sharing the clone's own index would let two checkouts of different
/// revisions corrupt each other.
const INDEX_DIR: &str = "pinbox-index";

pub(super) fn clone(git: &str, remote: &str, repo_path: &Path) -> Result<()> {
    run_vcs(
        git,
        &[
            "clone".to_string(),
            "--bare".to_string(),
            "--quiet".to_string(),
            "--".to_string(),
            remote.to_string(),
            path_arg(repo_path),
        ],
        &[],
        None,
    )?;
    Ok(())
}

pub(super) fn fetch(git: &str, remote: &str, repo_path: &Path) -> Result<()> {
    run_vcs(
        git,
        &[
            "--git-dir".to_string(),
            path_arg(repo_path),
            "fetch".to_string(),
            "--quiet".to_string(),
            "--tags".to_string(),
            "--force".to_string(),
            "--".to_string(),
            remote.to_string(),
            "+refs/heads/*:refs/heads/*".to_string(),
        ],
        &[],
        None,
    )?;
    Ok(())
}

pub(super) fn checkout(git: &str, rev: &str, workdir_root: &Path, repo_path: &Path) -> Result<()> {
    fs::create_dir_all(workdir_root)
        .with_context(|| format!("failed to create {}", workdir_root.display()))?;
    let index = index_path(repo_path, workdir_root);
    if let Some(parent) = index.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let envs = [("GIT_INDEX_FILE".to_string(), path_arg(&index))];
    let base = [
        "--git-dir".to_string(),
        path_arg(repo_path),
        "--work-tree".to_string(),
        path_arg(workdir_root),
    ];
    let with_base = |rest: &[&str]| -> Vec<String> {
        base.iter()
            .cloned()
            .chain(rest.iter().map(|arg| (*arg).to_string()))
            .collect()
    };

    let commit = format!("{rev}^{{commit}}");
    run_vcs(
        git,
        &with_base(&["rev-parse", "--verify", "--quiet", commit.as_str()]),
        &envs,
        Some(workdir_root),
    )
    .with_context(|| format!("revision {rev} not found"))?;
    run_vcs(
        git,
        &with_base(&["read-tree", "--reset", "-u", commit.as_str()]),
        &envs,
        Some(workdir_root),
    )?;
    run_vcs(
        git,
        &with_base(&["clean", "-f", "-f", "-d", "-x", "-q"]),
        &envs,
        Some(workdir_root),
    )?;
    Ok(())
}

fn index_path(repo_path: &Path, workdir_root: &Path) -> PathBuf {
    repo_path
        .join(INDEX_DIR)
        .join(digest_key(&[&workdir_root.to_string_lossy()]))
}

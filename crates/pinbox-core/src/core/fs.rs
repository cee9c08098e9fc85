use std::fs;
use std::path::{self, Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing::debug;

/// Best-effort recursive chmod for trees a build tool may have left read-only.
#[cfg(unix)]
pub(crate) fn make_writable_recursive(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let Ok(meta) = fs::symlink_metadata(path) else {
        return;
    };
    if meta.file_type().is_symlink() {
        return;
    }
    let mode = if meta.is_dir() { 0o755 } else { 0o644 };
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
    if meta.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                make_writable_recursive(&entry.path());
            }
        }
    }
}

#[cfg(not(unix))]
pub(crate) fn make_writable_recursive(path: &Path) {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return;
    };
    if meta.file_type().is_symlink() {
        return;
    }
    let mut perms = meta.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        let _ = fs::set_permissions(path, perms);
    }
    if meta.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                make_writable_recursive(&entry.path());
            }
        }
    }
}

/// `path` anchored at the current directory when relative. Kept as given
/// only if the current directory cannot be resolved.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Remove `path` and everything under it. A missing path is not an error.
pub(crate) fn remove_dir_all_writable(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err).with_context(|| format!("failed to stat {}", path.display())),
    };
    if meta.file_type().is_symlink() {
        fs::remove_file(path)
            .with_context(|| format!("failed to remove symlink {}", path.display()))?;
        return Ok(());
    }
    if fs::remove_dir_all(path).is_ok() {
        return Ok(());
    }
    make_writable_recursive(path);
    fs::remove_dir_all(path).with_context(|| format!("failed to remove {}", path.display()))?;
    Ok(())
}

/// Delete directories under `root` that have not been touched for `max_age`.
/// Used to reclaim scratch directories of runs that were killed.
pub(crate) fn prune_stale_dirs(root: &Path, max_age: Duration) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    let now = SystemTime::now();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        let Some(modified) = meta.modified().ok() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age < max_age {
            continue;
        }
        let path = entry.path();
        match remove_dir_all_writable(&path) {
            Ok(()) => debug!(path = %path.display(), "pruned stale directory"),
            Err(err) => debug!(path = %path.display(), %err, "failed to prune stale directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn absolute_path_anchors_relative_paths() {
        let cwd = std::env::current_dir().expect("cwd");
        assert_eq!(absolute_path(Path::new("spool")), cwd.join("spool"));
        assert_eq!(absolute_path(Path::new("/var/tmp/x")), Path::new("/var/tmp/x"));
    }

    #[test]
    fn remove_missing_path_is_ok() {
        let temp = tempfile::tempdir().expect("tempdir");
        remove_dir_all_writable(&temp.path().join("absent")).expect("missing path");
    }

    #[cfg(unix)]
    #[test]
    fn remove_handles_read_only_trees() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("tree");
        let nested = root.join("pkg");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("file.go"), "package pkg").expect("write");
        fs::set_permissions(&nested, fs::Permissions::from_mode(0o555)).expect("chmod");

        remove_dir_all_writable(&root).expect("remove");
        assert!(!root.exists());
    }

    #[test]
    fn prune_keeps_fresh_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let fresh = temp.path().join("fresh");
        fs::create_dir_all(&fresh).expect("mkdir");
        prune_stale_dirs(temp.path(), Duration::from_secs(60 * 60));
        assert!(fresh.exists());

        prune_stale_dirs(temp.path(), Duration::ZERO);
        assert!(!fresh.exists());
    }
}

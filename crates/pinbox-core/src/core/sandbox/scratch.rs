use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use anyhow::Result;
use pinbox_domain::TARGET_DIR;
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, warn};

use super::errors::SandboxError;
use crate::core::fs::{absolute_path, prune_stale_dirs, remove_dir_all_writable};

const SCRATCH_ID_BYTES: usize = 16;
const MAX_ATTEMPTS: usize = 8;
const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);

/// Empty, uniquely named directory prepended to the search path so anything
/// the build tool writes to "the first entry" lands somewhere disposable.
///
/// The directory is removed when the guard drops, whichever way the run ends.
#[derive(Debug)]
pub struct ScratchTarget {
    path: PathBuf,
    armed: bool,
}

impl ScratchTarget {
    /// Create `spool/target/<random id>`.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::ScratchAllocation`] when the directory cannot
    /// be created.
    pub fn allocate(spool: &Path) -> Result<Self, SandboxError> {
        let root = absolute_path(spool).join(TARGET_DIR);
        let alloc_err = |cause: String| SandboxError::ScratchAllocation {
            root: root.clone(),
            cause,
        };
        fs::create_dir_all(&root).map_err(|err| alloc_err(err.to_string()))?;
        prune_once(&root);

        for _ in 0..MAX_ATTEMPTS {
            let path = root.join(scratch_id());
            match fs::create_dir(&path) {
                Ok(()) => {
                    debug!(scratch = %path.display(), "scratch target allocated");
                    return Ok(Self { path, armed: true });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    debug!(scratch = %path.display(), "scratch id collision");
                }
                Err(err) => return Err(alloc_err(err.to_string())),
            }
        }
        Err(alloc_err(format!(
            "no free scratch name after {MAX_ATTEMPTS} attempts"
        )))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now and report failures instead of logging them.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be removed.
    pub fn release(mut self) -> Result<()> {
        self.armed = false;
        remove_dir_all_writable(&self.path)?;
        debug!(scratch = %self.path.display(), "scratch target released");
        Ok(())
    }
}

impl Drop for ScratchTarget {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = remove_dir_all_writable(&self.path) {
            warn!(scratch = %self.path.display(), %err, "failed to remove scratch target");
        }
    }
}

/// Reclaim directories of killed runs, once per root per process.
fn prune_once(root: &Path) {
    static PRUNED: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    let pruned = PRUNED.get_or_init(|| Mutex::new(HashSet::new()));
    let first = match pruned.lock() {
        Ok(mut guard) => guard.insert(root.to_path_buf()),
        Err(_) => false,
    };
    if first {
        prune_stale_dirs(root, STALE_AFTER);
    }
}

/// Hex-encoded random identifier of fixed length.
pub(crate) fn scratch_id() -> String {
    let mut bytes = [0u8; SCRATCH_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_id_has_fixed_length() {
        let id = scratch_id();
        assert_eq!(id.len(), SCRATCH_ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn allocate_creates_empty_dir_removed_on_drop() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchTarget::allocate(temp.path()).expect("allocate");
        let path = scratch.path().to_path_buf();
        assert!(path.starts_with(temp.path().join(TARGET_DIR)));
        assert!(path.is_dir());
        assert_eq!(fs::read_dir(&path).expect("read").count(), 0);

        fs::create_dir_all(path.join("pkg/bin")).expect("tool output");
        fs::write(path.join("pkg/bin/app"), "binary").expect("write");
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn release_removes_dir_and_disarms_drop() {
        let temp = tempfile::tempdir().expect("tempdir");
        let scratch = ScratchTarget::allocate(temp.path()).expect("allocate");
        let path = scratch.path().to_path_buf();
        scratch.release().expect("release");
        assert!(!path.exists());
    }

    #[test]
    fn scratch_is_removed_during_unwind() {
        let temp = tempfile::tempdir().expect("tempdir");
        let spool = temp.path().to_path_buf();
        let result = std::panic::catch_unwind(move || {
            let scratch = ScratchTarget::allocate(&spool).expect("allocate");
            let path = scratch.path().to_path_buf();
            assert!(path.exists());
            panic!("build step failed");
        });
        assert!(result.is_err());
        let remaining = fs::read_dir(temp.path().join(TARGET_DIR))
            .expect("read")
            .count();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn many_allocations_never_collide() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut seen = HashSet::new();
        let mut held = Vec::new();
        for _ in 0..10_000 {
            let scratch = ScratchTarget::allocate(temp.path()).expect("allocate");
            assert!(seen.insert(scratch.path().to_path_buf()));
            held.push(scratch);
        }
        assert_eq!(seen.len(), 10_000);
        drop(held);
        let remaining = fs::read_dir(temp.path().join(TARGET_DIR))
            .expect("read")
            .count();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn allocation_fails_when_spool_is_a_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let spool = temp.path().join("spool");
        fs::write(&spool, "not a directory").expect("write");
        let err = ScratchTarget::allocate(&spool).unwrap_err();
        assert!(matches!(err, SandboxError::ScratchAllocation { .. }));
    }

    #[test]
    fn allocate_prunes_stale_scratch_dirs() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join(TARGET_DIR);
        let stale = root.join("stale");
        let fresh = root.join("fresh");
        fs::create_dir_all(stale.join("pkg")).expect("mkdir stale");
        fs::write(stale.join("pkg/left.a"), "leftover").expect("write");
        fs::create_dir_all(&fresh).expect("mkdir fresh");
        filetime::set_file_mtime(&stale, filetime::FileTime::from_unix_time(0, 0))
            .expect("backdate");

        let _scratch = ScratchTarget::allocate(temp.path()).expect("allocate");
        assert!(!stale.exists(), "killed runs are reclaimed");
        assert!(fresh.exists(), "recent directories belong to live runs");
    }
}

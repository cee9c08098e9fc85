//! Sandbox construction: pinned checkouts composed into one search path.

mod compose;
mod errors;
mod lock;
mod materialize;
mod run;
mod scratch;

use std::path::{Path, PathBuf};

use crate::core::fs::absolute_path;
use crate::core::vcs::VcsAdapter;

pub use errors::SandboxError;
pub use scratch::ScratchTarget;

/// Builds sandboxes under one spool root using one VCS adapter.
pub struct SandboxBuilder<'a> {
    spool: PathBuf,
    vcs: &'a dyn VcsAdapter,
    locking: bool,
}

impl<'a> SandboxBuilder<'a> {
    /// A relative `spool` is anchored at the current directory; VCS commands
    /// and the tool run elsewhere and need absolute roots.
    #[must_use]
    pub fn new(spool: &Path, vcs: &'a dyn VcsAdapter) -> Self {
        Self {
            spool: absolute_path(spool),
            vcs,
            locking: true,
        }
    }

    /// Toggle the per-repository advisory locks.
    #[must_use]
    pub fn with_locking(mut self, locking: bool) -> Self {
        self.locking = locking;
        self
    }
}

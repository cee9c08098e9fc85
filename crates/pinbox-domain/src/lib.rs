#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod dependency;
pub mod layout;
pub mod manifest;
pub mod search_path;

pub use dependency::{Dependency, VcsKind};
pub use layout::{digest_key, LOCK_DIR, REPO_DIR, REV_DIR, TARGET_DIR};
pub use manifest::{Manifest, ManifestError, DEFAULT_MANIFEST};
pub use search_path::{SearchPath, SEARCH_PATH_SEPARATOR};

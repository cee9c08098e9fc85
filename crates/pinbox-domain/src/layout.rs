//! On-disk layout of the spool directory.
//!
//! ```text
//! <spool>/repo/<key(remote)>            cached clone, shared by every rev
//! <spool>/rev/<key(import_path, rev)>   sandbox root added to the search path
//! <spool>/rev/<..>/src/<import_path>    checked-out working copy
//! <spool>/target/<random id>            per-run scratch directory
//! <spool>/lock/<key(remote)>.lock       advisory lock for one repository
//! ```
//!
//! The cached directories must stay stable across releases; changing how keys
//! are derived orphans every existing checkout.

use sha2::{Digest, Sha256};

pub const REPO_DIR: &str = "repo";
pub const REV_DIR: &str = "rev";
pub const TARGET_DIR: &str = "target";
pub const LOCK_DIR: &str = "lock";

const KEY_LEN: usize = 32;

/// Hash `parts` into a fixed-length, filesystem-safe directory name.
///
/// Parts are separated by a NUL byte so `("ab", "c")` and `("a", "bc")` never
/// share a key.
#[must_use]
pub fn digest_key(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            hasher.update([0u8]);
        }
        hasher.update(part.as_bytes());
    }
    let mut key = hex::encode(hasher.finalize());
    key.truncate(KEY_LEN);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_key_is_fixed_length_hex() {
        let key = digest_key(&["https://github.com/kr/pretty"]);
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_key_separates_parts() {
        assert_ne!(digest_key(&["ab", "c"]), digest_key(&["a", "bc"]));
        assert_eq!(digest_key(&["a", "b"]), digest_key(&["a", "b"]));
    }
}

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::{digest_key, LOCK_DIR, REPO_DIR, REV_DIR};

/// Version-control system backing a dependency's remote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Git,
    Hg,
}

impl VcsKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VcsKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "hg" | "mercurial" => Ok(Self::Hg),
            other => Err(other.to_string()),
        }
    }
}

/// One dependency pinned to an exact revision.
///
/// Records are rebuilt from the manifest on every run; only the directories
/// derived from them persist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub import_path: String,
    pub remote: String,
    pub rev: String,
    #[serde(default)]
    pub vcs: VcsKind,
}

impl Dependency {
    pub fn new(
        import_path: impl Into<String>,
        remote: impl Into<String>,
        rev: impl Into<String>,
    ) -> Self {
        Self {
            import_path: import_path.into(),
            remote: remote.into(),
            rev: rev.into(),
            vcs: VcsKind::Git,
        }
    }

    #[must_use]
    pub fn with_vcs(mut self, vcs: VcsKind) -> Self {
        self.vcs = vcs;
        self
    }

    /// Cache key shared by every dependency cloned from the same remote.
    pub fn repo_key(&self) -> String {
        digest_key(&[&self.remote])
    }

    /// Location of the cached clone. Depends on the remote only.
    pub fn repo_path(&self, spool: &Path) -> PathBuf {
        spool.join(REPO_DIR).join(self.repo_key())
    }

    /// Root that, placed on the search path, resolves this dependency under
    /// its import path. Depends on `(import_path, rev)` only.
    pub fn sandbox_root(&self, spool: &Path) -> PathBuf {
        spool
            .join(REV_DIR)
            .join(digest_key(&[&self.import_path, &self.rev]))
    }

    /// Checked-out working copy inside [`Dependency::sandbox_root`].
    pub fn workdir_root(&self, spool: &Path) -> PathBuf {
        let mut path = self.sandbox_root(spool).join("src");
        for segment in self.import_path.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    pub fn lock_path(&self, spool: &Path) -> PathBuf {
        spool
            .join(LOCK_DIR)
            .join(format!("{}.lock", self.repo_key()))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.import_path, self.rev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spool() -> PathBuf {
        PathBuf::from("/spool")
    }

    #[test]
    fn repo_path_depends_only_on_remote() {
        let a = Dependency::new("example.com/a", "https://example.com/repo", "v1");
        let b = Dependency::new("example.com/a/sub", "https://example.com/repo", "v2");
        let c = Dependency::new("example.com/a", "https://example.com/other", "v1");
        assert_eq!(a.repo_path(&spool()), b.repo_path(&spool()));
        assert_ne!(a.repo_path(&spool()), c.repo_path(&spool()));
        assert!(a.repo_path(&spool()).starts_with("/spool/repo"));
    }

    #[test]
    fn sandbox_root_depends_on_import_path_and_rev() {
        let v1 = Dependency::new("example.com/a", "https://example.com/repo", "v1");
        let v2 = Dependency::new("example.com/a", "https://example.com/repo", "v2");
        let mirror = Dependency::new("example.com/a", "https://mirror.example.com/repo", "v1");
        assert_ne!(v1.sandbox_root(&spool()), v2.sandbox_root(&spool()));
        assert_eq!(v1.sandbox_root(&spool()), mirror.sandbox_root(&spool()));
    }

    #[test]
    fn workdir_sits_under_import_path() {
        let dep = Dependency::new("github.com/kr/pretty", "https://github.com/kr/pretty", "abc");
        let root = dep.sandbox_root(&spool());
        assert_eq!(
            dep.workdir_root(&spool()),
            root.join("src").join("github.com").join("kr").join("pretty")
        );
    }

    #[test]
    fn vcs_kind_parses_known_names() {
        assert_eq!("git".parse::<VcsKind>(), Ok(VcsKind::Git));
        assert_eq!(" HG ".parse::<VcsKind>(), Ok(VcsKind::Hg));
        assert_eq!("mercurial".parse::<VcsKind>(), Ok(VcsKind::Hg));
        assert_eq!("svn".parse::<VcsKind>(), Err("svn".to_string()));
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub(crate) fn git_available() -> bool {
    which::which("git").is_ok()
}

pub(crate) fn hg_available() -> bool {
    which::which("hg").is_ok()
}

/// Throwaway upstream repository with a linear history.
pub(crate) struct TestRepo {
    root: PathBuf,
}

impl TestRepo {
    pub(crate) fn init(root: &Path) -> Self {
        fs::create_dir_all(root).expect("create repo dir");
        let repo = Self {
            root: root.to_path_buf(),
        };
        repo.git(&["init", "--quiet"]);
        repo
    }

    pub(crate) fn url(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    /// Write `files`, commit them, and return the new commit id.
    pub(crate) fn commit(&self, files: &[(&str, &str)], message: &str) -> String {
        for (name, contents) in files {
            let path = self.root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(path, contents).expect("write file");
        }
        self.git(&["add", "--all"]);
        self.git(&["commit", "--quiet", "-m", message]);
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args([
                "-c",
                "user.name=pinbox",
                "-c",
                "user.email=pinbox@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

/// Mercurial counterpart of [`TestRepo`].
pub(crate) struct HgTestRepo {
    root: PathBuf,
}

impl HgTestRepo {
    pub(crate) fn init(root: &Path) -> Self {
        fs::create_dir_all(root).expect("create repo dir");
        let repo = Self {
            root: root.to_path_buf(),
        };
        repo.hg(&["init"]);
        repo
    }

    pub(crate) fn url(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    /// Write `files`, commit them, and return the new changeset id.
    pub(crate) fn commit(&self, files: &[(&str, &str)], message: &str) -> String {
        for (name, contents) in files {
            let path = self.root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(path, contents).expect("write file");
        }
        self.hg(&["commit", "--addremove", "--user", "pinbox", "--message", message]);
        self.hg(&["log", "--rev", ".", "--template", "{node}"])
            .trim()
            .to_string()
    }

    fn hg(&self, args: &[&str]) -> String {
        let output = Command::new("hg")
            .arg("--cwd")
            .arg(&self.root)
            .args(args)
            .env("HGPLAIN", "1")
            .env("HGRCPATH", "")
            .output()
            .expect("run hg");
        assert!(
            output.status.success(),
            "hg {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

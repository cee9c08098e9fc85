#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use assert_cmd::assert::Assert;
use serde_json::{json, Value};

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

/// Write a Godeps manifest pinning `deps` as `(import_path, remote, rev)`.
pub fn write_manifest(project: &Path, deps: &[(&str, &str, &str)]) -> PathBuf {
    let deps: Vec<Value> = deps
        .iter()
        .map(|(import_path, remote, rev)| {
            json!({ "ImportPath": import_path, "Remote": remote, "Rev": rev })
        })
        .collect();
    let manifest = json!({
        "ImportPath": "example.com/app",
        "GoVersion": "go1.1",
        "Deps": deps,
    });
    fs::create_dir_all(project).expect("project dir");
    let path = project.join("Godeps");
    fs::write(&path, serde_json::to_string_pretty(&manifest).expect("json")).expect("manifest");
    path
}

/// Upstream git repository used as a dependency remote.
pub struct Upstream {
    root: PathBuf,
}

impl Upstream {
    pub fn init(root: &Path) -> Self {
        fs::create_dir_all(root).expect("upstream dir");
        let upstream = Self {
            root: root.to_path_buf(),
        };
        upstream.git(&["init", "--quiet"]);
        upstream
    }

    pub fn url(&self) -> String {
        self.root.to_string_lossy().into_owned()
    }

    pub fn commit(&self, file: &str, contents: &str) -> String {
        fs::write(self.root.join(file), contents).expect("write file");
        self.git(&["add", "--all"]);
        self.git(&["commit", "--quiet", "-m", file]);
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

pub fn scratch_entries(spool: &Path) -> usize {
    fs::read_dir(spool.join("target"))
        .map(Iterator::count)
        .unwrap_or(0)
}

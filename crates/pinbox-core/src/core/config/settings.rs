use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pinbox_domain::DEFAULT_MANIFEST;

use crate::core::fs::absolute_path;

pub const DEFAULT_SPOOL: &str = "/var/tmp/pinbox";
pub const DEFAULT_TOOL: &str = "go";
pub const DEFAULT_PATH_VAR: &str = "GOPATH";

/// Command-line overrides that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub spool: Option<String>,
    pub manifest: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn flag_disabled(&self, key: &str) -> bool {
        self.var(key).is_some_and(|value| {
            matches!(
                value.to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            )
        })
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

/// Settings for one run. The spool root is always explicit here so nothing
/// below the command layer touches a process-wide location.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) spool: PathBuf,
    pub(crate) manifest: PathBuf,
    pub(crate) tool: String,
    pub(crate) path_var: String,
    pub(crate) locking: bool,
    pub(crate) parent_search_path: Option<String>,
}

impl Config {
    /// Builds a configuration from the process environment and CLI overrides.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be resolved.
    pub fn from_env(global: &GlobalOptions) -> Result<Self> {
        let snapshot = EnvSnapshot::capture();
        let cwd = env::current_dir().context("failed to resolve the working directory")?;
        Ok(Self::from_snapshot(&snapshot, global, &cwd))
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, global: &GlobalOptions, cwd: &Path) -> Self {
        let spool = global
            .spool
            .as_deref()
            .or_else(|| snapshot.var("PINBOX_SPOOL"))
            .unwrap_or(DEFAULT_SPOOL);
        let manifest = global
            .manifest
            .as_deref()
            .or_else(|| snapshot.var("PINBOX_MANIFEST"))
            .unwrap_or(DEFAULT_MANIFEST);
        let path_var = snapshot
            .var("PINBOX_PATH_VAR")
            .unwrap_or(DEFAULT_PATH_VAR)
            .to_string();
        Self {
            spool: absolutize(cwd, spool),
            manifest: absolutize(cwd, manifest),
            tool: snapshot.var("PINBOX_TOOL").unwrap_or(DEFAULT_TOOL).to_string(),
            parent_search_path: snapshot.var(&path_var).map(ToOwned::to_owned),
            path_var,
            locking: !snapshot.flag_disabled("PINBOX_LOCKS"),
        }
    }

    /// Configuration rooted at an explicit spool, used by embedders and tests.
    /// A relative spool is anchored at the current directory.
    #[must_use]
    pub fn with_spool(spool: impl Into<PathBuf>) -> Self {
        Self {
            spool: absolute_path(&spool.into()),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            tool: DEFAULT_TOOL.to_string(),
            path_var: DEFAULT_PATH_VAR.to_string(),
            locking: true,
            parent_search_path: None,
        }
    }

    #[must_use]
    pub fn manifest_path(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = manifest.into();
        self
    }

    #[must_use]
    pub fn spool(&self) -> &Path {
        &self.spool
    }

    #[must_use]
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    #[must_use]
    pub fn path_var(&self) -> &str {
        &self.path_var
    }

    #[must_use]
    pub fn locking(&self) -> bool {
        self.locking
    }
}

fn absolutize(cwd: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

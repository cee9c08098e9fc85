//! `Godeps` manifest reader.
//!
//! The manifest is a JSON document listing every pinned package. Packages
//! that live in the same repository at the same revision collapse into one
//! [`Dependency`] so each checkout is materialized once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::dependency::{Dependency, VcsKind};

pub const DEFAULT_MANIFEST: &str = "Godeps";

/// Hosts whose repository root is always the first three path segments.
const KNOWN_HOSTS: [&str; 3] = ["github.com", "bitbucket.org", "gitlab.com"];

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dependency #{index} is missing \"{field}\"")]
    MissingField { index: usize, field: &'static str },
    #[error("invalid import path '{import_path}'")]
    InvalidImportPath { import_path: String },
    #[error("cannot derive a remote for '{import_path}'")]
    UnknownRemote { import_path: String },
    #[error("unsupported vcs '{vcs}' for '{import_path}' (expected git or hg)")]
    UnsupportedVcs { import_path: String, vcs: String },
    #[error("'{import_path}' is pinned to both {first} and {second}")]
    ConflictingRevisions {
        import_path: String,
        first: String,
        second: String,
    },
}

impl ManifestError {
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Read { .. } => Some("Run from the project root or pass --manifest <FILE>."),
            Self::UnknownRemote { .. } => {
                Some("Add a \"Remote\" entry naming the repository to clone.")
            }
            Self::ConflictingRevisions { .. } => {
                Some("Pin every package of one repository to the same revision.")
            }
            Self::UnsupportedVcs { .. } => Some("Set \"Vcs\" to \"git\" or \"hg\"."),
            Self::Parse(_) | Self::MissingField { .. } | Self::InvalidImportPath { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGodeps {
    import_path: Option<String>,
    go_version: Option<String>,
    #[serde(default)]
    deps: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDependency {
    #[serde(default)]
    import_path: String,
    #[serde(default)]
    rev: String,
    #[serde(default)]
    remote: Option<String>,
    #[serde(default)]
    vcs: Option<String>,
}

/// Parsed manifest. `deps` keeps manifest order, which decides search-path
/// precedence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub import_path: Option<String>,
    pub go_version: Option<String>,
    pub deps: Vec<Dependency>,
}

impl Manifest {
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::parse(&contents)?;
        debug!(
            path = %path.display(),
            deps = manifest.deps.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    pub fn parse(contents: &str) -> Result<Self, ManifestError> {
        let raw: RawGodeps = serde_json::from_str(contents)?;
        let mut deps: Vec<Dependency> = Vec::with_capacity(raw.deps.len());
        let mut seen: HashMap<String, String> = HashMap::new();
        for (index, entry) in raw.deps.into_iter().enumerate() {
            let dep = dependency_from_raw(index, entry)?;
            match seen.get(&dep.import_path) {
                Some(rev) if *rev == dep.rev => continue,
                Some(rev) => {
                    return Err(ManifestError::ConflictingRevisions {
                        import_path: dep.import_path,
                        first: rev.clone(),
                        second: dep.rev,
                    })
                }
                None => {
                    seen.insert(dep.import_path.clone(), dep.rev.clone());
                    deps.push(dep);
                }
            }
        }
        Ok(Self {
            import_path: raw.import_path,
            go_version: raw.go_version,
            deps,
        })
    }
}

fn dependency_from_raw(index: usize, raw: RawDependency) -> Result<Dependency, ManifestError> {
    let import_path = raw.import_path.trim().trim_end_matches('/').to_string();
    if import_path.is_empty() {
        return Err(ManifestError::MissingField {
            index,
            field: "ImportPath",
        });
    }
    let rev = raw.rev.trim().to_string();
    if rev.is_empty() {
        return Err(ManifestError::MissingField { index, field: "Rev" });
    }
    validate_import_path(&import_path)?;

    let vcs = match raw.vcs.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(name) => name
            .parse::<VcsKind>()
            .map_err(|vcs| ManifestError::UnsupportedVcs {
                import_path: import_path.clone(),
                vcs,
            })?,
        None => VcsKind::Git,
    };

    // The checkout holds the whole repository, so it must sit at the repo
    // root. An explicit remote cannot reveal the root on other hosts; there
    // `ImportPath` is taken as the root.
    let (import_path, remote) = match raw.remote.map(|r| r.trim().to_string()) {
        Some(remote) if !remote.is_empty() => {
            (repo_root(&import_path).unwrap_or(import_path), remote)
        }
        _ => {
            let root =
                repo_root(&import_path).ok_or_else(|| ManifestError::UnknownRemote {
                    import_path: import_path.clone(),
                })?;
            let remote = format!("https://{root}");
            (root, remote)
        }
    };

    Ok(Dependency::new(import_path, remote, rev).with_vcs(vcs))
}

fn validate_import_path(import_path: &str) -> Result<(), ManifestError> {
    let invalid = import_path.starts_with('/')
        || import_path.contains('\\')
        || import_path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(ManifestError::InvalidImportPath {
            import_path: import_path.to_string(),
        });
    }
    Ok(())
}

/// Repository root for import paths on well-known hosts.
fn repo_root(import_path: &str) -> Option<String> {
    let segments: Vec<&str> = import_path.split('/').collect();
    if segments.len() < 3 || !KNOWN_HOSTS.contains(&segments[0]) {
        return None;
    }
    Some(segments[..3].join("/"))
}

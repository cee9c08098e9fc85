use std::path::PathBuf;

use pinbox_domain::Dependency;
use serde_json::{json, Value};

/// Fatal errors while building the sandbox or running the tool inside it.
///
/// Per-dependency variants carry the import path and revision so the user
/// can tell exactly which pin broke.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("can't clone {remote} for {import_path} rev {rev}: {cause}")]
    Clone {
        import_path: String,
        rev: String,
        remote: String,
        cause: String,
    },
    #[error("fetch {remote} for {import_path} rev {rev}: {cause}")]
    Fetch {
        import_path: String,
        rev: String,
        remote: String,
        cause: String,
    },
    #[error("checkout {import_path} rev {rev}: {cause}")]
    Checkout {
        import_path: String,
        rev: String,
        remote: String,
        cause: String,
    },
    #[error("failed to lock the cache for {import_path}: {cause}")]
    CacheLock {
        import_path: String,
        lock: PathBuf,
        cause: String,
    },
    #[error("failed to create a scratch directory under {root}: {cause}")]
    ScratchAllocation { root: PathBuf, cause: String },
    #[error("{tool}: {cause}")]
    ToolInvocation {
        tool: String,
        code: Option<i32>,
        cause: String,
    },
}

impl SandboxError {
    pub(crate) fn clone_failed(dep: &Dependency, err: &anyhow::Error) -> Self {
        Self::Clone {
            import_path: dep.import_path.clone(),
            rev: dep.rev.clone(),
            remote: dep.remote.clone(),
            cause: format!("{err:#}"),
        }
    }

    pub(crate) fn fetch_failed(dep: &Dependency, err: &anyhow::Error) -> Self {
        Self::Fetch {
            import_path: dep.import_path.clone(),
            rev: dep.rev.clone(),
            remote: dep.remote.clone(),
            cause: format!("{err:#}"),
        }
    }

    pub(crate) fn checkout_failed(dep: &Dependency, err: &anyhow::Error) -> Self {
        Self::Checkout {
            import_path: dep.import_path.clone(),
            rev: dep.rev.clone(),
            remote: dep.remote.clone(),
            cause: format!("{err:#}"),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Clone { .. } => "PB101",
            Self::Fetch { .. } => "PB102",
            Self::Checkout { .. } => "PB103",
            Self::CacheLock { .. } => "PB104",
            Self::ScratchAllocation { .. } => "PB110",
            Self::ToolInvocation { .. } => "PB120",
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Clone { .. } => "clone_failed",
            Self::Fetch { .. } => "fetch_failed",
            Self::Checkout { .. } => "checkout_failed",
            Self::CacheLock { .. } => "cache_lock_failed",
            Self::ScratchAllocation { .. } => "scratch_allocation_failed",
            Self::ToolInvocation { code: None, .. } => "tool_launch_failed",
            Self::ToolInvocation { .. } => "tool_failed",
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Clone { .. } | Self::Fetch { .. } => {
                Some("Check the remote is reachable and the VCS tool is installed.")
            }
            Self::Checkout { .. } => Some("Check the pinned revision exists in the remote."),
            Self::CacheLock { .. } | Self::ScratchAllocation { .. } => {
                Some("Check the spool directory is writable (PINBOX_SPOOL / --spool).")
            }
            Self::ToolInvocation { code: None, .. } => {
                Some("Install the tool or point PINBOX_TOOL at it.")
            }
            Self::ToolInvocation { .. } => None,
        }
    }

    /// The dependency this error belongs to, if any.
    #[must_use]
    pub fn import_path(&self) -> Option<&str> {
        match self {
            Self::Clone { import_path, .. }
            | Self::Fetch { import_path, .. }
            | Self::Checkout { import_path, .. }
            | Self::CacheLock { import_path, .. } => Some(import_path),
            Self::ScratchAllocation { .. } | Self::ToolInvocation { .. } => None,
        }
    }

    /// Process exit status for this error. A tool that ran and failed keeps
    /// its own status.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolInvocation {
                code: Some(code), ..
            } if *code != 0 => *code,
            Self::ToolInvocation { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn details(&self) -> Value {
        let mut details = json!({
            "code": self.code(),
            "reason": self.reason(),
            "exit_code": self.exit_code(),
        });
        if let Value::Object(map) = &mut details {
            if let Some(hint) = self.hint() {
                map.insert("hint".into(), json!(hint));
            }
            match self {
                Self::Clone {
                    import_path,
                    rev,
                    remote,
                    cause,
                }
                | Self::Fetch {
                    import_path,
                    rev,
                    remote,
                    cause,
                }
                | Self::Checkout {
                    import_path,
                    rev,
                    remote,
                    cause,
                } => {
                    map.insert("import_path".into(), json!(import_path));
                    map.insert("rev".into(), json!(rev));
                    map.insert("remote".into(), json!(remote));
                    map.insert("cause".into(), json!(cause));
                }
                Self::CacheLock {
                    import_path,
                    lock,
                    cause,
                } => {
                    map.insert("import_path".into(), json!(import_path));
                    map.insert("lock".into(), json!(lock.display().to_string()));
                    map.insert("cause".into(), json!(cause));
                }
                Self::ScratchAllocation { root, cause } => {
                    map.insert("root".into(), json!(root.display().to_string()));
                    map.insert("cause".into(), json!(cause));
                }
                Self::ToolInvocation { tool, code, cause } => {
                    map.insert("tool".into(), json!(tool));
                    map.insert("tool_exit_code".into(), json!(code));
                    map.insert("cause".into(), json!(cause));
                }
            }
        }
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep() -> Dependency {
        Dependency::new("example.com/b", "https://r2", "v2")
    }

    #[test]
    fn checkout_error_names_dependency_and_rev() {
        let err = SandboxError::checkout_failed(&dep(), &anyhow::anyhow!("bad object"));
        assert_eq!(err.to_string(), "checkout example.com/b rev v2: bad object");
        assert_eq!(err.import_path(), Some("example.com/b"));
        assert_eq!(err.exit_code(), 1);
        let details = err.details();
        assert_eq!(details["code"], "PB103");
        assert_eq!(details["rev"], "v2");
        assert_eq!(details["remote"], "https://r2");
    }

    #[test]
    fn clone_error_keeps_context_chain() {
        let cause = anyhow::anyhow!("connection refused").context("git clone failed");
        let err = SandboxError::clone_failed(&dep(), &cause);
        assert_eq!(
            err.to_string(),
            "can't clone https://r2 for example.com/b rev v2: git clone failed: connection refused"
        );
        assert_eq!(err.reason(), "clone_failed");
    }

    #[test]
    fn tool_errors_map_exit_codes() {
        let exited = SandboxError::ToolInvocation {
            tool: "go".into(),
            code: Some(3),
            cause: "exited with status 3".into(),
        };
        assert_eq!(exited.exit_code(), 3);
        assert_eq!(exited.reason(), "tool_failed");
        assert!(exited.hint().is_none());

        let missing = SandboxError::ToolInvocation {
            tool: "go".into(),
            code: None,
            cause: "executable not found".into(),
        };
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(missing.details()["reason"], "tool_launch_failed");
        assert!(missing.import_path().is_none());
    }
}

//! Command entry points shared by the CLI and embedders.

use std::sync::Arc;

use anyhow::Result;
use pinbox_domain::{Manifest, ManifestError};
use serde_json::json;
use tracing::{debug, info};

use crate::config::{Config, GlobalOptions};
use crate::core::runtime::invoke::ToolRequest;
use crate::core::sandbox::{SandboxBuilder, SandboxError};
use crate::core::vcs::{SystemVcs, VcsAdapter};
use crate::outcome::ExecutionOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinboxCommand {
    /// Run the configured build tool.
    Go { args: Vec<String> },
    /// Run an explicit tool.
    Exec { tool: String, args: Vec<String> },
    /// Print the composed dependency search path.
    Path,
}

impl PinboxCommand {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Go { .. } => "go",
            Self::Exec { .. } => "exec",
            Self::Path => "path",
        }
    }
}

/// Configuration plus the VCS backend a command runs against.
pub struct CommandContext {
    config: Config,
    vcs: Arc<dyn VcsAdapter>,
}

impl CommandContext {
    /// Context for the current process environment with the system VCS tools.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be resolved.
    pub fn new(global: &GlobalOptions) -> Result<Self> {
        Ok(Self::from_config(Config::from_env(global)?))
    }

    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            vcs: Arc::new(SystemVcs::new()),
        }
    }

    #[must_use]
    pub fn with_vcs(mut self, vcs: Arc<dyn VcsAdapter>) -> Self {
        self.vcs = vcs;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn sandbox(&self) -> SandboxBuilder<'_> {
        SandboxBuilder::new(self.config.spool(), self.vcs.as_ref())
            .with_locking(self.config.locking())
    }
}

/// Run `command` against the current environment.
///
/// # Errors
/// Returns an error only when the context itself cannot be built; command
/// failures are reported through the outcome.
pub fn execute(global: &GlobalOptions, command: &PinboxCommand) -> Result<ExecutionOutcome> {
    let ctx = CommandContext::new(global)?;
    Ok(execute_with(&ctx, command))
}

#[must_use]
pub fn execute_with(ctx: &CommandContext, command: &PinboxCommand) -> ExecutionOutcome {
    let manifest = match Manifest::read(ctx.config.manifest()) {
        Ok(manifest) => manifest,
        Err(err) => return manifest_error(ctx, &err),
    };
    if manifest.deps.is_empty() {
        info!(manifest = %ctx.config.manifest().display(), "manifest pins no dependencies");
    }
    debug!(
        command = command.name(),
        spool = %ctx.config.spool().display(),
        deps = manifest.deps.len(),
        "executing"
    );

    match command {
        PinboxCommand::Path => match ctx.sandbox().compose_all(&manifest.deps) {
            Ok(search_path) => {
                let entries: Vec<String> = search_path
                    .entries()
                    .iter()
                    .map(|entry| entry.display().to_string())
                    .collect();
                ExecutionOutcome::success(
                    search_path.to_string(),
                    json!({
                        "passthrough": true,
                        "entries": entries,
                        "exit_code": 0,
                    }),
                )
            }
            Err(err) => sandbox_error(&err),
        },
        PinboxCommand::Go { args } => run(ctx, &manifest, ctx.config.tool(), args),
        PinboxCommand::Exec { tool, args } => run(ctx, &manifest, tool, args),
    }
}

fn run(ctx: &CommandContext, manifest: &Manifest, tool: &str, args: &[String]) -> ExecutionOutcome {
    let request = ToolRequest::from_config(&ctx.config, tool, args.to_vec());
    match ctx.sandbox().run_tool(&manifest.deps, &request) {
        Ok(code) => ExecutionOutcome::success(
            String::new(),
            json!({
                "passthrough": true,
                "tool": tool,
                "exit_code": code,
            }),
        ),
        Err(err) => sandbox_error(&err),
    }
}

fn manifest_error(ctx: &CommandContext, err: &ManifestError) -> ExecutionOutcome {
    let mut details = json!({
        "code": "PB001",
        "reason": "invalid_manifest",
        "manifest": ctx.config.manifest().display().to_string(),
        "exit_code": 1,
    });
    if let Some(hint) = err.hint() {
        details["hint"] = json!(hint);
    }
    ExecutionOutcome::user_error(err.to_string(), details)
}

fn sandbox_error(err: &SandboxError) -> ExecutionOutcome {
    ExecutionOutcome::failure(err.to_string(), err.details())
}

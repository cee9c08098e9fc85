#![deny(clippy::all, warnings)]

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::runtime::process;
pub(crate) use crate::core::tooling::outcome;

pub use crate::core::commands::{execute, execute_with, CommandContext, PinboxCommand};
pub use crate::core::config::{
    Config, GlobalOptions, DEFAULT_PATH_VAR, DEFAULT_SPOOL, DEFAULT_TOOL,
};
pub use crate::core::runtime::invoke::{invoke_tool, ToolRequest};
pub use crate::core::sandbox::{SandboxBuilder, SandboxError, ScratchTarget};
pub use crate::core::tooling::outcome::{
    exit_code_for, format_status_message, to_json_response, CommandStatus, ExecutionOutcome,
};
pub use crate::core::vcs::{SystemVcs, VcsAdapter};

pub use pinbox_domain::{Dependency, Manifest, ManifestError, SearchPath, VcsKind};

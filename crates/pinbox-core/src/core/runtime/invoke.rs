use pinbox_domain::SearchPath;
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_PATH_VAR};
use crate::core::sandbox::SandboxError;
use crate::process::run_command_passthrough;

/// What to run inside the sandbox and how to hand it the search path.
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub tool: String,
    pub args: Vec<String>,
    /// Environment variable that receives the search path.
    pub path_var: String,
    /// The parent's own value of `path_var`, appended after our entries.
    pub fallback: Option<String>,
}

impl ToolRequest {
    pub fn new(tool: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            tool: tool.into(),
            args,
            path_var: DEFAULT_PATH_VAR.to_string(),
            fallback: None,
        }
    }

    /// Request for `tool` using the configured variable and parent value.
    pub fn from_config(config: &Config, tool: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            tool: tool.into(),
            args,
            path_var: config.path_var().to_string(),
            fallback: config.parent_search_path.clone(),
        }
    }

    /// The single environment override handed to the child; everything else
    /// is inherited from this process.
    pub(crate) fn env_override(&self, search_path: &SearchPath) -> (String, String) {
        (
            self.path_var.clone(),
            search_path.to_env_value(self.fallback.as_deref()),
        )
    }
}

/// Run the tool with inherited stdio and block until it exits.
///
/// # Errors
///
/// Returns [`SandboxError::ToolInvocation`] when the tool cannot be launched
/// or exits unsuccessfully; the latter carries the tool's exit code.
pub fn invoke_tool(request: &ToolRequest, search_path: &SearchPath) -> Result<i32, SandboxError> {
    let program = which::which(&request.tool).map_err(|err| SandboxError::ToolInvocation {
        tool: request.tool.clone(),
        code: None,
        cause: format!("executable not found: {err}"),
    })?;
    let (key, value) = request.env_override(search_path);
    info!(tool = %request.tool, %key, %value, "running tool");
    let output = run_command_passthrough(&program, &request.args, &[(key, value)])
        .map_err(|err| SandboxError::ToolInvocation {
            tool: request.tool.clone(),
            code: None,
            cause: format!("{err:#}"),
        })?;
    debug!(tool = %request.tool, code = output.code, "tool exited");
    if !output.success() {
        return Err(SandboxError::ToolInvocation {
            tool: request.tool.clone(),
            code: Some(output.code),
            cause: format!("exited with status {}", output.code),
        });
    }
    Ok(output.code)
}

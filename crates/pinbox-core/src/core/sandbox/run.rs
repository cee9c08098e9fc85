use pinbox_domain::Dependency;
use tracing::warn;

use super::errors::SandboxError;
use super::scratch::ScratchTarget;
use super::SandboxBuilder;
use crate::core::runtime::invoke::{invoke_tool, ToolRequest};

impl SandboxBuilder<'_> {
    /// Build the sandbox for `deps` and run the tool inside it.
    ///
    /// The scratch target is allocated after every dependency is in place and
    /// goes first on the search path. It is removed before this returns, on
    /// success and on every error.
    ///
    /// # Errors
    ///
    /// Returns the first sandbox error, or the tool's invocation error. The
    /// tool never runs if the sandbox could not be built.
    pub fn run_tool(&self, deps: &[Dependency], request: &ToolRequest) -> Result<i32, SandboxError> {
        let mut search_path = self.compose_all(deps)?;
        let scratch = ScratchTarget::allocate(&self.spool)?;
        search_path.prepend(scratch.path().to_path_buf());

        let result = invoke_tool(request, &search_path);

        let scratch_path = scratch.path().to_path_buf();
        if let Err(err) = scratch.release() {
            warn!(scratch = %scratch_path.display(), %err, "failed to remove scratch target");
        }
        result
    }
}

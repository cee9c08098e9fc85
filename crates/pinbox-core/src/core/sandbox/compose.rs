use pinbox_domain::{Dependency, SearchPath};
use tracing::{debug, info};

use super::errors::SandboxError;
use super::SandboxBuilder;

impl SandboxBuilder<'_> {
    /// Materialize every dependency in manifest order and return their roots
    /// in that same order.
    ///
    /// Stops at the first failure; dependencies after it are not touched.
    /// Repositories already cloned stay in the cache.
    ///
    /// # Errors
    ///
    /// Returns the first dependency's [`SandboxError`].
    pub fn compose_all(&self, deps: &[Dependency]) -> Result<SearchPath, SandboxError> {
        let mut path = SearchPath::new();
        for (idx, dep) in deps.iter().enumerate() {
            debug!(
                index = idx,
                import_path = %dep.import_path,
                rev = %dep.rev,
                "materializing"
            );
            let root = self.materialize(dep)?;
            path.push(root);
        }
        info!(deps = deps.len(), spool = %self.spool.display(), "sandbox ready");
        Ok(path)
    }
}

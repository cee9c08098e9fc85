pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod fs;
pub(crate) mod runtime;
pub(crate) mod sandbox;
pub(crate) mod tooling;
pub(crate) mod vcs;

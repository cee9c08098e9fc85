mod settings;

pub use settings::{Config, GlobalOptions, DEFAULT_PATH_VAR, DEFAULT_SPOOL, DEFAULT_TOOL};

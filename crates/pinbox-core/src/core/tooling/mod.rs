//! Outcome shaping for the CLI.

pub(crate) mod outcome;

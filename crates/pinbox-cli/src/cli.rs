use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser, Subcommand};

pub const PINBOX_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nCommands:\n{subcommands}\n\nOptions:\n{options}\n";

pub const PINBOX_BEFORE_HELP: &str = concat!(
    "pinbox ",
    env!("CARGO_PKG_VERSION"),
    " – build against pinned dependency checkouts\n\n",
    "Reads the Godeps manifest, checks every dependency out at its pinned\n",
    "revision under the spool directory, and runs the build tool with GOPATH\n",
    "pointing at a fresh scratch directory followed by those checkouts.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "pinbox",
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = PINBOX_BEFORE_HELP,
    help_template = PINBOX_HELP_TEMPLATE
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PinboxCli {
    #[arg(short, long, help = "Suppress human output (errors still print to stderr)")]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vvv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
    #[arg(
        long,
        value_name = "DIR",
        value_parser = value_parser!(PathBuf),
        help = "Spool directory holding clones and checkouts (default: $PINBOX_SPOOL or /var/tmp/pinbox)"
    )]
    pub spool: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        value_parser = value_parser!(PathBuf),
        help = "Manifest to read (default: $PINBOX_MANIFEST or ./Godeps)"
    )]
    pub manifest: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the build tool ($PINBOX_TOOL, default go) inside the sandbox.",
        override_usage = "pinbox go [ARG]...",
        disable_help_flag = true
    )]
    Go(GoArgs),
    #[command(
        about = "Run an arbitrary tool inside the sandbox.",
        override_usage = "pinbox exec <TOOL> [ARG]...",
        disable_help_flag = true
    )]
    Exec(ExecArgs),
    #[command(about = "Check out every dependency and print the composed search path.")]
    Path,
}

#[derive(Args, Debug)]
pub struct GoArgs {
    #[arg(
        value_name = "ARG",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        help = "Arguments passed to the tool unchanged"
    )]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    #[arg(value_name = "TOOL", help = "Program to run, looked up on PATH")]
    pub tool: String,
    #[arg(
        value_name = "ARG",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        help = "Arguments passed to the tool unchanged"
    )]
    pub args: Vec<String>,
}

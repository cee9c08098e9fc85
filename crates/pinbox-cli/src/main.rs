use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use pinbox_core::{GlobalOptions, PinboxCommand};

mod cli;
mod output;
mod style;

use cli::{Commands, PinboxCli};
use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PinboxCli::parse();
    init_tracing(cli.trace, cli.verbose, cli.quiet);

    let global = GlobalOptions {
        spool: cli.spool.as_ref().map(|p| p.to_string_lossy().to_string()),
        manifest: cli.manifest.as_ref().map(|p| p.to_string_lossy().to_string()),
    };

    let command = build_command(&cli.command);
    let outcome = pinbox_core::execute(&global, &command).map_err(|err| eyre!("{err:?}"))?;
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = output::emit_output(&opts, &command, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout belongs to the tool and to `pinbox path`.
fn init_tracing(trace: bool, verbose: u8, quiet: bool) {
    let level = if trace {
        "trace"
    } else if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = format!(
        "pinbox={level},pinbox_cli={level},pinbox_core={level},pinbox_domain={level}"
    );
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .without_time()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn build_command(command: &Commands) -> PinboxCommand {
    match command {
        Commands::Go(args) => PinboxCommand::Go {
            args: args.args.clone(),
        },
        Commands::Exec(args) => PinboxCommand::Exec {
            tool: args.tool.clone(),
            args: args.args.clone(),
        },
        Commands::Path => PinboxCommand::Path,
    }
}

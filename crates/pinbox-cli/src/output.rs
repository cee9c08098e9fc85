use std::io::{self, Write};

use atty::Stream;
use color_eyre::Result;
use pinbox_core::{CommandStatus, ExecutionOutcome, PinboxCommand};

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

/// Render `outcome` and return the process exit code.
///
/// Successful `go`/`exec` runs print nothing: the tool owns stdout. Failures
/// go to stderr so `--quiet` never hides them.
pub fn emit_output(
    opts: &OutputOptions,
    command: &PinboxCommand,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = pinbox_core::exit_code_for(outcome);

    if opts.json {
        let payload = pinbox_core::to_json_response(command.name(), outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    if outcome.status == CommandStatus::Ok {
        if opts.quiet {
            return Ok(code);
        }
        let style = Style::new(opts.no_color, atty::is(Stream::Stdout));
        if outcome.is_passthrough() {
            if !outcome.message.is_empty() {
                println!("{}", outcome.message);
            }
        } else {
            let message = pinbox_core::format_status_message(command.name(), &outcome.message);
            println!("{}", style.status(outcome.status, &message));
        }
        return Ok(code);
    }

    let style = Style::new(opts.no_color, atty::is(Stream::Stderr));
    let mut stderr = io::stderr().lock();
    let message = pinbox_core::format_status_message(command.name(), &outcome.message);
    writeln!(stderr, "{}", style.status(outcome.status, &message))?;
    if let Some(hint) = outcome.hint() {
        writeln!(stderr, "{}", style.info(&format!("Tip: {hint}")))?;
    }
    Ok(code)
}

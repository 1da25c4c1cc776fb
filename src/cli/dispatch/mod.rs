use std::io::{self, Write};
use std::time::Instant;

use crate::cli::{Cli, Command};
use crate::error::{Error, Result};
use crate::version;

mod generate;
mod logging;
mod reporting;
#[cfg(test)]
mod tests;

/// Execute a parsed CLI command. Logging and error reporting are configured
/// here so the binary entrypoint can stay thin.
pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Like [`run`], with command output sent to `out`.
pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let log_options = cli.log_options.resolved();
    let trace_requested = logging::command_requests_trace(&cli.command);
    let effective_level = logging::resolve_effective_level(&log_options, trace_requested);
    logging::init_logging(&log_options, effective_level);
    let start = Instant::now();
    logging::log_run_start(&cli.command, &log_options, trace_requested);
    let result = dispatch_command(&cli.command, out);
    logging::log_run_complete(&cli.command, start.elapsed(), &result);
    result
}

fn dispatch_command(command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Generate(options) => generate::run(options, out),
        Command::Help { topic } => {
            let text = match topic {
                Some(topic) => Cli::help_for(topic)?,
                None => Cli::usage(),
            };
            write!(out, "{text}")?;
            Ok(())
        }
        Command::Version => {
            writeln!(out, "{}", version::formatted())?;
            Ok(())
        }
    }
}

pub fn report_error(err: &Error) {
    reporting::report_error(err);
}

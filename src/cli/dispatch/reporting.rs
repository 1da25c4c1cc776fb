use std::io::{self, Write};
use std::path::Path;

use crate::driver::{GenerationOutput, WriteReport};
use crate::error::Error;

pub(super) fn report_error(err: &Error) {
    let mut out = io::stderr();
    if let Err(io_err) = report_error_to(err, &mut out) {
        let _ = writeln!(io::stderr(), "failed to report error: {io_err}");
    }
}

pub(super) fn report_error_to(err: &Error, out: &mut dyn Write) -> io::Result<()> {
    match err {
        Error::Cli(cli_err) => writeln!(out, "{cli_err}")?,
        _ => {
            writeln!(out, "error: {err}")?;
            if cfg!(debug_assertions) {
                if let Some(backtrace) = err.backtrace() {
                    writeln!(out, "stack trace:")?;
                    writeln!(out, "{backtrace}")?;
                }
            }
        }
    }
    Ok(())
}

/// Print every fragment preceded by a banner naming its id.
pub(super) fn print_fragments(output: &GenerationOutput, out: &mut dyn Write) -> io::Result<()> {
    for fragment in &output.fragments {
        writeln!(out, "// ---- {} ----", fragment.id)?;
        out.write_all(fragment.source.as_bytes())?;
        if !fragment.source.ends_with('\n') {
            writeln!(out)?;
        }
    }
    Ok(())
}

pub(super) fn print_summary(
    dir: &Path,
    output: &GenerationOutput,
    report: &WriteReport,
    out: &mut dyn Write,
) -> io::Result<()> {
    let stats = output.stats;
    writeln!(
        out,
        "generated {} fragment(s) into {} ({} written, {} unchanged)",
        stats.total(),
        dir.display(),
        report.written.len(),
        report.unchanged.len()
    )?;
    writeln!(
        out,
        "  support: {}, cancellable: {}, postfix: {}",
        stats.support, stats.cancellable, stats.postfix
    )
}

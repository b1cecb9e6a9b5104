//! Terminal output: JSON on stdout, diagnostics on stderr.

use crate::error::Result;
use crate::packager::Diagnostics;
use serde::Serialize;
use std::io::Write;

/// Writes every diagnostic to stderr, one block each.
pub fn print_diagnostics(diagnostics: &Diagnostics) -> std::io::Result<()> {
    let mut stderr = std::io::stderr().lock();
    for diagnostic in diagnostics {
        writeln!(stderr, "{diagnostic}")?;
    }
    stderr.flush()
}

/// Writes `value` to stdout as pretty JSON followed by a newline.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Exit code for a finished request.
pub fn exit_code(diagnostics: &Diagnostics) -> i32 {
    if diagnostics.has_error() { 1 } else { 0 }
}

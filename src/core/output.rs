//! Error presentation for the command line.
//!
//! Diagnostics go to stderr so stdout stays a clean stream of rendered commits.

use crate::core::error::LogViewError;
use colored::*;

/// A short follow-up for errors the user can fix themselves
fn hint(error: &LogViewError) -> Option<&'static str> {
    match error {
        LogViewError::NotInGitRepo => Some("run git-logview inside a git working tree"),
        LogViewError::EmptyHistory => Some("make a first commit on this branch"),
        LogViewError::ConfigParseFailed { .. } => Some("fix or remove the defaults file"),
        _ => None,
    }
}

/// Plain text of an error report, one line per entry
pub fn format_error(error: &LogViewError) -> String {
    match hint(error) {
        Some(hint) => format!("{error}\n  hint: {hint}"),
        None => error.to_string(),
    }
}

/// Prints an error report to stderr
///
/// # Format
/// ```text
/// ✕ Error: <message>
///   hint: <hint>
/// ```
pub fn print_error(error: &LogViewError) {
    let report = format_error(error);
    let mut lines = report.lines();
    if let Some(first) = lines.next() {
        eprintln!("{} {}", "✕ Error:".red(), first.white());
    }
    for line in lines {
        eprintln!("{}", line.bright_black());
    }
}

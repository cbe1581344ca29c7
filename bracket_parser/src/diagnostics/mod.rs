//! Per-input report lines
//!
//! Acceptance prints three lines, rejection prints one. The wording is fixed
//! and is what downstream tooling matches on.

use crate::syntax::{Acceptance, SyntaxError};
use crate::utils::SourceMap;

pub const ACCEPTED: &str = "Input accepted with no errors";

/// Lines for an accepted input
pub fn success_lines(accepted: &Acceptance) -> Vec<String> {
    vec![
        ACCEPTED.to_string(),
        format!("Total number of brackets: {}", accepted.bracket_count),
        format!(
            "Brackets are present in lines: {}",
            format_line_list(&accepted.lines_with_brackets())
        ),
    ]
}

/// Line for a rejected input
pub fn failure_line(error: &SyntaxError) -> String {
    error.to_string()
}

/// `[1, 2, 5]`
pub fn format_line_list(lines: &[u32]) -> String {
    let joined: Vec<String> = lines.iter().map(u32::to_string).collect();
    format!("[{}]", joined.join(", "))
}

/// The source line holding the offending token, with a caret under it
pub fn source_snippet(error: &SyntaxError, source: &str) -> Option<String> {
    let span = error.span()?;
    SourceMap::new(source).snippet(&span)
}

//! Feature-scenario dialect (`.feature`)

use super::annotated;
use crate::cursor::LineCursor;
use crate::grammar::GrammarResult;

pub const INDICATOR: &str = "Scenario: ";

pub fn filter(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

/// Everything after `Scenario: `
pub fn case_name(line: &str) -> Option<&str> {
    let start = line.find(INDICATOR)? + INDICATOR.len();
    let name = line[start..].trim();
    (!name.is_empty()).then_some(name)
}

pub fn expect_documentation_start(cursor: &mut LineCursor<'_>, case: &str) -> GrammarResult<()> {
    annotated::expect_docstring_quotes(cursor, case)
}

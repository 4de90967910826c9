//! Keyword-table dialect (`.robot`)
//!
//! Only the `*** Test Cases ***` section is read. Case names sit on their own
//! line (`<NEW>: Title` or `TC-GID-42: Title`) followed by a
//! `[Documentation]` line and `...`-continued documentation.

use super::continuation::join_continuations;
use crate::cursor::LineCursor;
use crate::grammar::{GrammarError, GrammarResult};

pub const INDICATOR: &str = "*** Test Cases ***";
pub(crate) const DOCUMENTATION_MARKER: &str = "[Documentation]";
pub(crate) const PLACEHOLDER: &str = "<NEW>";
const SECTION_PREFIX: &str = "***";
const CONTINUATION_MARKER: &str = "...";

fn strip_continuation_marker(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix(CONTINUATION_MARKER)
        .map(str::trim)
        .unwrap_or(line)
}

/// Keep only the test-case section, without `...` markers
///
/// A file without the section yields an empty block.
pub fn filter(text: &str) -> GrammarResult<String> {
    if text.matches(INDICATOR).count() > 1 {
        return Err(GrammarError::MultipleSectionMarkers);
    }

    let mut lines = text.lines();
    if !lines.by_ref().any(|line| line.trim() == INDICATOR) {
        return Ok(String::new());
    }

    let section = lines.take_while(|line| !line.starts_with(SECTION_PREFIX));
    Ok(join_continuations(section, strip_continuation_marker))
}

/// The whole trimmed line is the case name
pub fn case_name(line: &str) -> Option<&str> {
    let name = line.trim();
    (!name.is_empty()).then_some(name)
}

/// The line after the case name must hold `[Documentation]`
pub fn expect_documentation_start(cursor: &mut LineCursor<'_>, case: &str) -> GrammarResult<()> {
    match cursor.next_line() {
        Some(line) if line.contains(DOCUMENTATION_MARKER) => Ok(()),
        _ => Err(GrammarError::missing_documentation_marker(case)),
    }
}

/// `TC-GID-42: Login` -> `GID-42`
pub fn derive_global_id(name: &str) -> String {
    let start = name.find("TC-").map(|i| i + 3).unwrap_or(0);
    let rest = &name[start..];
    let end = rest.find(':').unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

/// `<NEW>: Login` + `GID-42` -> `TC-GID-42: Login`
pub fn assigned_name(name: &str, global_id: &str) -> String {
    name.replacen(PLACEHOLDER, &format!("TC-{}", global_id), 1)
}

//! Annotated-function dialect (`.py`)
//!
//! Cases are `def test_NEW_<name>(...)` / `def test_gid_<n>_<name>(...)`
//! functions whose doc-string holds the documentation block.

use super::continuation::join_continuations;
use crate::cursor::LineCursor;
use crate::grammar::{GrammarError, GrammarResult};

pub const INDICATOR: &str = "def ";
pub(crate) const UPDATE_NAME_PREFIX: &str = "test_gid_";
pub(crate) const ADD_NAME_TOKEN: &str = "test_NEW";
pub(crate) const DOCSTRING_QUOTES: &str = "\"\"\"";

/// Trim every line and join backslash continuations
pub fn filter(text: &str) -> String {
    join_continuations(text.lines(), |line| line.trim())
}

/// Name between `def ` and the first `(`, ignoring any trailing comment
pub fn case_name(line: &str) -> Option<&str> {
    let code = strip_comment(line);
    let start = code.find(INDICATOR)? + INDICATOR.len();
    let rest = &code[start..];
    let name = match rest.find('(') {
        Some(end) => &rest[..end],
        None => rest,
    };
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Line up to the first `#` outside a string literal
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '#') => return &line[..i],
            (None, _) => {}
        }
    }
    line
}

/// Net `(` minus `)` on the code part of a signature line
fn paren_depth(code: &str) -> isize {
    code.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

/// Skip a wrapped signature, then require the doc-string opener on the next
/// non-blank line
pub fn expect_documentation_start(
    cursor: &mut LineCursor<'_>,
    header: &str,
    case: &str,
) -> GrammarResult<()> {
    let mut line = header;
    let mut depth = 0;
    loop {
        let code = strip_comment(line).trim_end();
        depth += paren_depth(code);
        if depth <= 0 && code.ends_with(':') {
            break;
        }
        line = cursor
            .next_line()
            .ok_or_else(|| GrammarError::docstring_start(case))?;
    }

    expect_docstring_quotes(cursor, case)
}

/// Next non-blank line must contain `"""`
pub(crate) fn expect_docstring_quotes(cursor: &mut LineCursor<'_>, case: &str) -> GrammarResult<()> {
    while let Some(line) = cursor.next_line() {
        if line.trim().is_empty() {
            continue;
        }
        return if line.contains(DOCSTRING_QUOTES) {
            Ok(())
        } else {
            Err(GrammarError::docstring_start(case))
        };
    }
    Err(GrammarError::docstring_start(case))
}

/// `test_gid_42_login` -> `GID-42`
pub fn derive_global_id(name: &str) -> String {
    let rest = name.strip_prefix(UPDATE_NAME_PREFIX).unwrap_or(name);
    let number = rest
        .split(|c: char| c == '_' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    format!("GID-{}", number)
}

/// `test_NEW_login` + `GID-42` -> `test_gid_42_login`
pub fn assigned_name(name: &str, global_id: &str) -> String {
    let token = format!("test_{}", global_id.to_lowercase().replace('-', "_"));
    name.replacen(ADD_NAME_TOKEN, &token, 1)
}

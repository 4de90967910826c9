//! Step reader for the `Steps:` section
//!
//! Each step is a triad read in order: `{n})` text, `ER:` expected result,
//! `Notes:` notes. Any element may continue onto following `-` lines.

use super::error::{GrammarError, GrammarResult};
use super::escape::escape_markup;
use crate::cursor::LineCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepElement {
    Step,
    ExpectedResult,
    Notes,
}

impl StepElement {
    pub const TRIAD: [StepElement; 3] = [
        StepElement::Step,
        StepElement::ExpectedResult,
        StepElement::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StepElement::Step => "Steps",
            StepElement::ExpectedResult => "ER",
            StepElement::Notes => "Notes",
        }
    }
}

/// Result of reading one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRead<'a> {
    /// Running step number after this element
    pub count: usize,
    /// First line after the element, trimmed; `""` at end of input
    pub next_line: &'a str,
    /// Escaped element text
    pub text: String,
}

/// Read one element starting at `line`, which the caller already consumed
pub fn read_step_element<'a>(
    cursor: &mut LineCursor<'a>,
    element: StepElement,
    count: usize,
    line: &str,
    case: &str,
) -> GrammarResult<StepRead<'a>> {
    let line = line.trim();
    let mut count = count;

    let mut text = match element {
        StepElement::Step => {
            let marker = format!("{})", count);
            let body = line
                .strip_prefix(marker.as_str())
                .ok_or_else(|| GrammarError::step_numbering(count, case))?;
            count += 1;
            body.trim().to_string()
        }
        StepElement::ExpectedResult | StepElement::Notes => line
            .strip_prefix(element.label())
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|body| body.trim().to_string())
            .ok_or_else(|| GrammarError::step_label(element.label(), case))?,
    };

    let mut next_line = cursor.next_line_or_blank().trim();
    while next_line.starts_with('-') {
        text.push('\n');
        text.push_str(next_line);
        next_line = cursor.next_line_or_blank().trim();
    }

    Ok(StepRead {
        count,
        next_line,
        text: escape_markup(&text),
    })
}

//! Section reader for `Description:`, `Prerequisites:` and `Test Data:`
//!
//! A section starts at a `<Name>:` header (anything after the colon on the
//! header line is ignored) and runs to the next blank line or the end of
//! input. The blank terminator is consumed.
//!
//! Every fragment is preceded by its separator: `"\n"` for Description
//! lines, `"\n\n"` for all other lines and for every table.

use super::error::{GrammarError, GrammarResult};
use super::escape::escape_markup;
use super::table::{read_table, BEGIN_TABLE};
use crate::cursor::LineCursor;

/// Free-text sections of a documentation block, in reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Description,
    Prerequisites,
    TestData,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::Description,
        Section::Prerequisites,
        Section::TestData,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Description => "Description",
            Section::Prerequisites => "Prerequisites",
            Section::TestData => "Test Data",
        }
    }

    /// Description accepts any line; the others require list markers
    fn is_free_form(&self) -> bool {
        matches!(self, Section::Description)
    }

    fn separator(&self) -> &'static str {
        if self.is_free_form() {
            "\n"
        } else {
            "\n\n"
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Check that the next line opens `label`; the first section of a case gets
/// the doc-string hint in its error
pub fn expect_header(
    cursor: &mut LineCursor<'_>,
    label: &str,
    case: &str,
    first: bool,
) -> GrammarResult<()> {
    let header = cursor.next_line_or_blank().trim();
    if header.starts_with(label) && header[label.len()..].starts_with(':') {
        Ok(())
    } else {
        Err(GrammarError::missing_section_header(label, case, first))
    }
}

/// Read one section body and return the accumulated, escaped text
pub fn read_section(
    cursor: &mut LineCursor<'_>,
    section: Section,
    case: &str,
) -> GrammarResult<String> {
    expect_header(cursor, section.label(), case, section == Section::Description)?;

    let mut count = 1;
    let mut text = String::new();
    let mut line = cursor.next_line_or_blank().trim();

    while !line.is_empty() {
        let numbered = line.starts_with(&format!("{})", count));

        if !section.is_free_form() && !(numbered || line.starts_with('-') || line == BEGIN_TABLE) {
            return Err(GrammarError::malformed_section_line(
                count,
                section.label(),
                case,
            ));
        }

        if line == BEGIN_TABLE {
            let table = read_table(cursor, section.label(), case)?;
            text.push_str("\n\n");
            text.push_str(&table);
        } else {
            if numbered && !section.is_free_form() {
                count += 1;
            }
            text.push_str(section.separator());
            text.push_str(&escape_markup(line));
        }

        line = cursor.next_line_or_blank().trim();
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_description_accepts_free_text() {
        let mut cursor = LineCursor::new("Description:\nLogs in as <admin>\nand checks it\n\nnext");
        let text = read_section(&mut cursor, Section::Description, "case").unwrap();
        assert_eq!(text, "\nLogs in as &lt;admin&gt;\nand checks it");
        assert_eq!(cursor.next_line(), Some("next"));
    }

    #[test]
    fn test_text_after_header_colon_is_ignored() {
        let mut cursor = LineCursor::new("Prerequisites: NA\n\nTest Data:");
        let text = read_section(&mut cursor, Section::Prerequisites, "case").unwrap();
        assert_eq!(text, "");
        assert_eq!(cursor.peek_line(), Some("Test Data:"));
    }

    #[test]
    fn test_numbered_and_dash_lines() {
        let mut cursor =
            LineCursor::new("   Test Data:\n 1) first\n - more\n2) second\n3) third");
        let text = read_section(&mut cursor, Section::TestData, "case").unwrap();
        assert_eq!(text, "\n\n1) first\n\n- more\n\n2) second\n\n3) third");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_numbering_gap_is_malformed() {
        let mut cursor = LineCursor::new("Prerequisites:\n1) first\n3) third\n");
        let error = read_section(&mut cursor, Section::Prerequisites, "test_NEW_a").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expecting either '2)', another dash '-', or '*begin table*' in the Prerequisites \
             section in test_NEW_a"
        );
    }

    #[test]
    fn test_table_inside_section() {
        let mut cursor = LineCursor::new(
            "Test Data:\n1) values\n*begin table*\na | b\nc | d\n*end table*\n- after\n\n",
        );
        let text = read_section(&mut cursor, Section::TestData, "case").unwrap();
        assert!(text.starts_with("\n\n1) values\n\n<p>&nbsp;</p><table"));
        assert!(text.ends_with("</table><p>&nbsp;</p>\n\n- after"));
    }

    #[test]
    fn test_description_table_uses_double_separator() {
        let mut cursor = LineCursor::new("Description:\nintro\n*begin table*\na|b\n*end table*");
        let text = read_section(&mut cursor, Section::Description, "case").unwrap();
        assert!(text.starts_with("\nintro\n\n<p>&nbsp;</p>"));
    }

    #[test]
    fn test_missing_headers() {
        let mut cursor = LineCursor::new("Steps:\n");
        assert_matches!(
            read_section(&mut cursor, Section::Description, "c"),
            Err(GrammarError::MissingSectionHeader { ref section, .. }) if section == "Description"
        );

        let mut cursor = LineCursor::new("Test Dat:\n");
        let error = read_section(&mut cursor, Section::TestData, "c").unwrap_err();
        assert!(error.to_string().contains("directly 2 lines below the last section"));

        let mut empty = LineCursor::new("");
        assert_matches!(
            read_section(&mut empty, Section::Prerequisites, "c"),
            Err(GrammarError::MissingSectionHeader { .. })
        );
    }

    #[test]
    fn test_header_requires_exact_label() {
        let mut cursor = LineCursor::new("Descriptions:\nx");
        assert_matches!(
            read_section(&mut cursor, Section::Description, "c"),
            Err(GrammarError::MissingSectionHeader { .. })
        );
    }
}

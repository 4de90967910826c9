//! Table sub-grammar: `*begin table*` ... `*end table*`
//!
//! Rows are `|`-separated; every row must have the column count of the
//! first. Tables render to a bordered HTML fragment wrapped in
//! non-breaking-space paragraphs.

use super::error::{GrammarError, GrammarResult};
use super::escape::escape_markup;
use crate::cursor::LineCursor;

pub const BEGIN_TABLE: &str = "*begin table*";
pub const END_TABLE: &str = "*end table*";

const TABLE_OPEN: &str = "<p>&nbsp;</p><table border=\"1\" cellpadding=\"1\" cellspacing=\"0\" \
     style=\"border-collapse:collapse; width:100%\">\n\t<tbody>";
const TABLE_CLOSE: &str = "\n\t</tbody>\n</table><p>&nbsp;</p>";

/// Buffer escaped rows after a `*begin table*` line and render them
///
/// The cursor is left on the line after `*end table*`.
pub fn read_table(cursor: &mut LineCursor<'_>, section: &str, case: &str) -> GrammarResult<String> {
    let mut rows = Vec::new();

    loop {
        let line = cursor.next_line_or_blank().trim();
        if line.is_empty() {
            return Err(GrammarError::unterminated_table(section, case));
        }
        if line == END_TABLE {
            break;
        }
        rows.push(escape_markup(line));
    }

    crate::log_debug!("Table read",
        "section" => section,
        "rows" => rows.len(),
        "line" => cursor.line_number()
    );

    render_table(&rows, case)
}

/// Render already-escaped rows as an HTML table fragment
pub fn render_table<S: AsRef<str>>(rows: &[S], case: &str) -> GrammarResult<String> {
    let first = rows.first().ok_or_else(|| GrammarError::empty_table(case))?;
    let expected = first.as_ref().split('|').count();

    let mut html = String::from(TABLE_OPEN);

    for (index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let found = row.split('|').count();
        if found != expected {
            return Err(GrammarError::table_column_mismatch(
                row,
                expected,
                found,
                index + 1,
                case,
            ));
        }

        html.push_str("\n\t\t<tr>");
        for cell in row.split('|') {
            html.push_str("\n\t\t\t<td>");
            html.push_str(cell.trim());
            html.push_str("</td>");
        }
        html.push_str("\n\t\t</tr>");
    }

    html.push_str(TABLE_CLOSE);
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_render_exact_layout() {
        let html = render_table(&["a | b", "c|d "], "case").unwrap();
        assert_eq!(
            html,
            "<p>&nbsp;</p><table border=\"1\" cellpadding=\"1\" cellspacing=\"0\" \
             style=\"border-collapse:collapse; width:100%\">\n\t<tbody>\
             \n\t\t<tr>\n\t\t\t<td>a</td>\n\t\t\t<td>b</td>\n\t\t</tr>\
             \n\t\t<tr>\n\t\t\t<td>c</td>\n\t\t\t<td>d</td>\n\t\t</tr>\
             \n\t</tbody>\n</table><p>&nbsp;</p>"
        );
    }

    #[test]
    fn test_trailing_pipe_counts_as_column() {
        let html = render_table(&["x | y | z |", "1 | 2 | 3 |"], "case").unwrap();
        assert_eq!(html.matches("<td></td>").count(), 2);
    }

    #[test]
    fn test_equal_columns_succeed() {
        assert!(render_table(&["a|b|c", "d|e|f", "g|h|i"], "case").is_ok());
    }

    #[test]
    fn test_column_mismatch() {
        let result = render_table(&["a|b|c", "d|e"], "test_NEW_tables");
        assert_matches!(
            result,
            Err(GrammarError::TableColumnMismatch { expected: 3, found: 2, index: 2, .. })
        );
        let message = render_table(&["a|b|c", "d|e"], "test_NEW_tables")
            .unwrap_err()
            .to_string();
        assert!(message.contains("columns:3"));
        assert!(message.contains("has 2"));
    }

    #[test]
    fn test_empty_table() {
        let rows: [&str; 0] = [];
        assert_matches!(render_table(&rows, "c"), Err(GrammarError::EmptyTable { .. }));

        let mut cursor = LineCursor::new("*end table*\nnext");
        assert_matches!(
            read_table(&mut cursor, "Test Data", "c"),
            Err(GrammarError::EmptyTable { .. })
        );
    }

    #[test]
    fn test_read_table_escapes_and_stops_after_end() {
        let mut cursor = LineCursor::new("  <a> | b\n  c | d\n*end table*\nafter");
        let html = read_table(&mut cursor, "Description", "c").unwrap();
        assert!(html.contains("<td>&lt;a&gt;</td>"));
        assert_eq!(cursor.next_line(), Some("after"));
    }

    #[test]
    fn test_unterminated_table() {
        let mut blank = LineCursor::new("a | b\n\n*end table*");
        assert_matches!(
            read_table(&mut blank, "Prerequisites", "c"),
            Err(GrammarError::UnterminatedTable { .. })
        );

        let mut eof = LineCursor::new("a | b");
        let error = read_table(&mut eof, "Prerequisites", "test_NEW_x").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expecting '*end table*' in the Prerequisites section in test_NEW_x"
        );
    }
}

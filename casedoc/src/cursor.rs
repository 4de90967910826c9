//! Line cursor over a fully materialized documentation block

/// Forward-only cursor over the lines of a borrowed text buffer
///
/// Lines are returned with trailing whitespace stripped. `None` marks the
/// end of input.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            position: 0,
        }
    }

    pub fn peek_line(&self) -> Option<&'a str> {
        self.lines.get(self.position).map(|line| line.trim_end())
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek_line()?;
        self.position += 1;
        Some(line)
    }

    /// Like `next_line`, with end of input read as a blank line
    pub fn next_line_or_blank(&mut self) -> &'a str {
        self.next_line().unwrap_or("")
    }

    /// 1-based number of the last consumed line (0 before the first read)
    pub fn line_number(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.lines.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_whitespace_only() {
        let mut cursor = LineCursor::new("  Description:  \r\n\tbody\t\n");
        assert_eq!(cursor.peek_line(), Some("  Description:"));
        assert_eq!(cursor.next_line(), Some("  Description:"));
        assert_eq!(cursor.next_line(), Some("\tbody"));
        assert_eq!(cursor.next_line(), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_end_of_input_reads_as_blank() {
        let mut cursor = LineCursor::new("only");
        assert_eq!(cursor.next_line_or_blank(), "only");
        assert_eq!(cursor.next_line_or_blank(), "");
        assert_eq!(cursor.next_line_or_blank(), "");
        assert_eq!(cursor.line_number(), 1);
    }

    #[test]
    fn test_line_number_and_reset() {
        let mut cursor = LineCursor::new("a\nb\nc");
        assert_eq!(cursor.line_number(), 0);
        cursor.next_line();
        cursor.next_line();
        assert_eq!(cursor.line_number(), 2);
        cursor.reset();
        assert_eq!(cursor.peek_line(), Some("a"));
        assert_eq!(cursor.line_count(), 3);
    }
}

//! Grammar errors for documentation blocks
//!
//! Every variant is fatal to the block being assembled. Message text is
//! relied on by downstream consumers and must stay stable.

use crate::logging::{codes, Code};

pub type GrammarResult<T> = Result<T, GrammarError>;

const FIRST_SECTION_HINT: &str =
    " (if this section is present, check that it is the first line in the doc-string)";

const LATER_SECTION_HINT: &str = " or the previous section data (if this section is present, \
     check that it is directly 2 lines below the last section)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("Expecting '{section}' line in test case {case}{hint}")]
    MissingSectionHeader {
        section: String,
        case: String,
        hint: &'static str,
    },

    #[error(
        "Expecting either '{expected_count})', another dash '-', or '*begin table*' in the {section} section in {case}"
    )]
    MalformedSectionLine {
        expected_count: usize,
        section: String,
        case: String,
    },

    #[error("Expecting '*end table*' in the {section} section in {case}")]
    UnterminatedTable { section: String, case: String },

    #[error("No rows provided in the table entered in {case}")]
    EmptyTable { case: String },

    #[error(
        "Table row: '{row}' does not have the expected amount of columns:{expected} as the rest of the table in {case} (row {index} has {found})"
    )]
    TableColumnMismatch {
        row: String,
        expected: usize,
        found: usize,
        index: usize,
        case: String,
    },

    #[error("Expecting '{expected})' line under 'Steps' in test case {case}")]
    StepNumbering { expected: usize, case: String },

    #[error("Expecting '{label}:' line under 'Steps' in test case {case}")]
    StepLabel { label: String, case: String },

    #[error("Expecting 'Projects:' line in test case {case}")]
    MissingProjectsLine { case: String },

    #[error(
        "'Projects:' line has a project '{project}' that is not in the list of acceptable projects (reference the project list in the sync configuration) : {case}"
    )]
    UnknownProject { project: String, case: String },

    #[error("'Projects:' line in test case needs at least one project: {case}")]
    EmptyProjectScope { case: String },

    #[error(
        "Expecting immediate documentation start -\"\"\"- coming after the test case name in test case {case}"
    )]
    DocstringStart { case: String },

    #[error("Expecting '[Documentation]' line under test case {case}")]
    MissingDocumentationMarker { case: String },

    #[error(
        "There are too many test case sections in this file (make sure there are no commented out sections that contain the string '*** Test Cases ***')"
    )]
    MultipleSectionMarkers,
}

impl GrammarError {
    /// Missing header; the hint differs for the first section of a case
    pub fn missing_section_header(section: &str, case: &str, first: bool) -> Self {
        Self::MissingSectionHeader {
            section: section.to_string(),
            case: case.to_string(),
            hint: if first {
                FIRST_SECTION_HINT
            } else {
                LATER_SECTION_HINT
            },
        }
    }

    pub fn malformed_section_line(expected_count: usize, section: &str, case: &str) -> Self {
        Self::MalformedSectionLine {
            expected_count,
            section: section.to_string(),
            case: case.to_string(),
        }
    }

    pub fn unterminated_table(section: &str, case: &str) -> Self {
        Self::UnterminatedTable {
            section: section.to_string(),
            case: case.to_string(),
        }
    }

    pub fn empty_table(case: &str) -> Self {
        Self::EmptyTable {
            case: case.to_string(),
        }
    }

    pub fn table_column_mismatch(
        row: &str,
        expected: usize,
        found: usize,
        index: usize,
        case: &str,
    ) -> Self {
        Self::TableColumnMismatch {
            row: row.to_string(),
            expected,
            found,
            index,
            case: case.to_string(),
        }
    }

    pub fn step_numbering(expected: usize, case: &str) -> Self {
        Self::StepNumbering {
            expected,
            case: case.to_string(),
        }
    }

    pub fn step_label(label: &str, case: &str) -> Self {
        Self::StepLabel {
            label: label.to_string(),
            case: case.to_string(),
        }
    }

    pub fn missing_projects_line(case: &str) -> Self {
        Self::MissingProjectsLine {
            case: case.to_string(),
        }
    }

    pub fn unknown_project(project: &str, case: &str) -> Self {
        Self::UnknownProject {
            project: project.to_string(),
            case: case.to_string(),
        }
    }

    pub fn empty_project_scope(case: &str) -> Self {
        Self::EmptyProjectScope {
            case: case.to_string(),
        }
    }

    pub fn docstring_start(case: &str) -> Self {
        Self::DocstringStart {
            case: case.to_string(),
        }
    }

    pub fn missing_documentation_marker(case: &str) -> Self {
        Self::MissingDocumentationMarker {
            case: case.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::MissingSectionHeader { .. } => codes::grammar::MISSING_SECTION_HEADER,
            Self::MalformedSectionLine { .. } => codes::grammar::MALFORMED_SECTION_LINE,
            Self::UnterminatedTable { .. } => codes::grammar::UNTERMINATED_TABLE,
            Self::EmptyTable { .. } => codes::grammar::EMPTY_TABLE,
            Self::TableColumnMismatch { .. } => codes::grammar::TABLE_COLUMN_MISMATCH,
            Self::StepNumbering { .. } => codes::grammar::STEP_NUMBERING,
            Self::StepLabel { .. } => codes::grammar::STEP_LABEL,
            Self::MissingProjectsLine { .. } => codes::grammar::MISSING_PROJECTS_LINE,
            Self::UnknownProject { .. } => codes::grammar::UNKNOWN_PROJECT,
            Self::EmptyProjectScope { .. } => codes::grammar::EMPTY_PROJECT_SCOPE,
            Self::DocstringStart { .. } => codes::grammar::DOCSTRING_START,
            Self::MissingDocumentationMarker { .. } => {
                codes::grammar::MISSING_DOCUMENTATION_MARKER
            }
            Self::MultipleSectionMarkers => codes::grammar::MULTIPLE_SECTION_MARKERS,
        }
    }

    /// Name of the case the error was raised in, if any
    pub fn case_name(&self) -> Option<&str> {
        match self {
            Self::MissingSectionHeader { case, .. }
            | Self::MalformedSectionLine { case, .. }
            | Self::UnterminatedTable { case, .. }
            | Self::EmptyTable { case }
            | Self::TableColumnMismatch { case, .. }
            | Self::StepNumbering { case, .. }
            | Self::StepLabel { case, .. }
            | Self::MissingProjectsLine { case }
            | Self::UnknownProject { case, .. }
            | Self::EmptyProjectScope { case }
            | Self::DocstringStart { case }
            | Self::MissingDocumentationMarker { case } => Some(case),
            Self::MultipleSectionMarkers => None,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_hint_depends_on_position() {
        let first = GrammarError::missing_section_header("Description", "test_NEW_login", true);
        assert_eq!(
            first.to_string(),
            "Expecting 'Description' line in test case test_NEW_login (if this section is \
             present, check that it is the first line in the doc-string)"
        );

        let later = GrammarError::missing_section_header("Test Data", "test_NEW_login", false);
        assert_eq!(
            later.to_string(),
            "Expecting 'Test Data' line in test case test_NEW_login or the previous section \
             data (if this section is present, check that it is directly 2 lines below the \
             last section)"
        );
    }

    #[test]
    fn test_column_mismatch_names_counts() {
        let error = GrammarError::table_column_mismatch("a | b", 3, 2, 2, "<NEW>: Login");
        let message = error.to_string();
        assert!(message.contains("Table row: 'a | b'"));
        assert!(message.contains("columns:3"));
        assert!(message.contains("(row 2 has 2)"));
    }

    #[test]
    fn test_error_codes_and_metadata() {
        let error = GrammarError::step_numbering(2, "test_NEW_login");
        assert_eq!(error.error_code(), codes::grammar::STEP_NUMBERING);
        assert_eq!(error.case_name(), Some("test_NEW_login"));
        assert!(error.requires_halt());
        assert_eq!(error.category(), "Grammar");

        assert_eq!(GrammarError::MultipleSectionMarkers.case_name(), None);
    }

    #[test]
    fn test_docstring_message() {
        let error = GrammarError::docstring_start("test_NEW_login");
        assert_eq!(
            error.to_string(),
            "Expecting immediate documentation start -\"\"\"- coming after the test case name \
             in test case test_NEW_login"
        );
    }
}

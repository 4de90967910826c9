//! Source dialects that embed documentation blocks
//!
//! A [`Dialect`] is chosen once per run. Each variant pairs a fixed
//! [`DialectProfile`] record with pure functions in its submodule; the enum
//! methods only dispatch.

pub mod annotated;
mod continuation;
pub mod feature;
pub mod keyword_table;
pub mod rename;

pub use rename::{RenameError, RenameMap};

use crate::cursor::LineCursor;
use crate::file_processor::write_atomic;
use crate::grammar::GrammarResult;
use crate::logging::codes;
use crate::{log_debug, log_success};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Fixed markers for one dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    pub name: &'static str,
    pub file_extension: &'static str,
    pub test_case_indicator: &'static str,
    pub add_start_marker: &'static str,
    pub update_start_marker: &'static str,
    pub placeholder: &'static str,
}

const ANNOTATED_FUNCTION: DialectProfile = DialectProfile {
    name: "annotated-function",
    file_extension: "py",
    test_case_indicator: annotated::INDICATOR,
    add_start_marker: "def test_NEW_",
    update_start_marker: "def test_gid_",
    placeholder: "NEW",
};

const KEYWORD_TABLE: DialectProfile = DialectProfile {
    name: "keyword-table",
    file_extension: "robot",
    test_case_indicator: keyword_table::INDICATOR,
    add_start_marker: keyword_table::PLACEHOLDER,
    update_start_marker: "TC-GID",
    placeholder: keyword_table::PLACEHOLDER,
};

const FEATURE_SCENARIO: DialectProfile = DialectProfile {
    name: "feature-scenario",
    file_extension: "feature",
    test_case_indicator: feature::INDICATOR,
    add_start_marker: "Scenario: test_NEW",
    update_start_marker: "Scenario: test_gid",
    placeholder: "NEW",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    AnnotatedFunction,
    KeywordTable,
    FeatureScenario,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect '{name}' (expected one of: pytest, robot, gherkin)")]
pub struct UnknownDialect {
    pub name: String,
}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pytest" | "xframework" | "py" | "annotated-function" => Ok(Dialect::AnnotatedFunction),
            "robot" | "keyword-table" => Ok(Dialect::KeywordTable),
            "gherkin" | "feature" | "feature-scenario" => Ok(Dialect::FeatureScenario),
            _ => Err(UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [
        Dialect::AnnotatedFunction,
        Dialect::KeywordTable,
        Dialect::FeatureScenario,
    ];

    pub fn profile(&self) -> &'static DialectProfile {
        match self {
            Dialect::AnnotatedFunction => &ANNOTATED_FUNCTION,
            Dialect::KeywordTable => &KEYWORD_TABLE,
            Dialect::FeatureScenario => &FEATURE_SCENARIO,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Dialect> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.file_extension().eq_ignore_ascii_case(extension))
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn file_extension(&self) -> &'static str {
        self.profile().file_extension
    }

    pub fn test_case_indicator(&self) -> &'static str {
        self.profile().test_case_indicator
    }

    pub fn add_start_marker(&self) -> &'static str {
        self.profile().add_start_marker
    }

    pub fn update_start_marker(&self) -> &'static str {
        self.profile().update_start_marker
    }

    pub fn placeholder(&self) -> &'static str {
        self.profile().placeholder
    }

    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.file_extension()))
    }

    // ========================================================================
    // PARSING CAPABILITIES
    // ========================================================================

    /// Reduce raw file text to the lines the assembler reads
    pub fn filter_documentation_block(&self, text: &str) -> GrammarResult<String> {
        match self {
            Dialect::AnnotatedFunction => Ok(annotated::filter(text)),
            Dialect::KeywordTable => keyword_table::filter(text),
            Dialect::FeatureScenario => Ok(feature::filter(text)),
        }
    }

    /// Case name on a (trimmed) case header line
    pub fn case_name_from_header<'a>(&self, line: &'a str) -> &'a str {
        self.current_name_on_line(line).unwrap_or_else(|| line.trim())
    }

    /// Consume the dialect's documentation opener after a case header
    pub fn expect_documentation_start(
        &self,
        cursor: &mut LineCursor<'_>,
        header: &str,
        case: &str,
    ) -> GrammarResult<()> {
        match self {
            Dialect::AnnotatedFunction => annotated::expect_documentation_start(cursor, header, case),
            Dialect::KeywordTable => keyword_table::expect_documentation_start(cursor, case),
            Dialect::FeatureScenario => feature::expect_documentation_start(cursor, case),
        }
    }

    /// Global id of an update-mode case, in `GID-<n>` form
    pub fn derive_global_id(&self, case_name: &str) -> String {
        match self {
            Dialect::AnnotatedFunction | Dialect::FeatureScenario => {
                annotated::derive_global_id(case_name)
            }
            Dialect::KeywordTable => keyword_table::derive_global_id(case_name),
        }
    }

    /// Name a placeholder case takes once `global_id` is issued
    pub fn assigned_name(&self, case_name: &str, global_id: &str) -> String {
        match self {
            Dialect::AnnotatedFunction | Dialect::FeatureScenario => {
                annotated::assigned_name(case_name, global_id)
            }
            Dialect::KeywordTable => keyword_table::assigned_name(case_name, global_id),
        }
    }

    /// Case name a source line declares, if it declares one
    pub fn current_name_on_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        match self {
            Dialect::AnnotatedFunction => annotated::case_name(line),
            Dialect::KeywordTable => keyword_table::case_name(line),
            Dialect::FeatureScenario => feature::case_name(line),
        }
    }

    // ========================================================================
    // IDENTIFIER INJECTION
    // ========================================================================

    /// Substitute pending renames for `file_path` into `text`
    ///
    /// Matched entries are consumed from `renames`; text without matches is
    /// returned unchanged.
    pub fn inject_identifiers(&self, file_path: &str, text: &str, renames: &mut RenameMap) -> String {
        let Some(path) = renames.matching_path(file_path).map(str::to_string) else {
            return text.to_string();
        };

        let mut rewritten = String::with_capacity(text.len());

        for line in text.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            let pending = self.current_name_on_line(content).filter(|name| {
                renames
                    .pending_for(&path)
                    .is_some_and(|entries| entries.contains_key(*name))
            });

            match pending.and_then(|old| renames.consume(&path, old).map(|new| (old, new))) {
                Some((old_name, new_name)) => {
                    log_debug!("Identifier injected",
                        "path" => &path,
                        "old" => old_name,
                        "new" => &new_name
                    );
                    rewritten.push_str(&line.replace(old_name, &new_name));
                }
                None => rewritten.push_str(line),
            }
        }

        rewritten
    }

    /// Inject identifiers into a file on disk, replacing it atomically
    ///
    /// Returns whether the file changed. `renames` is only updated after the
    /// new content is persisted.
    pub fn rewrite_file(&self, path: &Path, renames: &mut RenameMap) -> Result<bool, RenameError> {
        let file_path = path.display().to_string();
        if renames.matching_path(&file_path).is_none() {
            return Ok(false);
        }

        let text = fs::read_to_string(path).map_err(|e| RenameError::Read {
            path: file_path.clone(),
            message: e.to_string(),
        })?;

        let mut pending = renames.clone();
        let rewritten = self.inject_identifiers(&file_path, &text, &mut pending);
        if pending == *renames {
            return Ok(false);
        }

        write_atomic(path, rewritten.as_bytes()).map_err(|e| RenameError::Write {
            path: file_path.clone(),
            message: e.to_string(),
        })?;

        let injected = renames.pending_count() - pending.pending_count();
        *renames = pending;

        log_success!(codes::success::IDENTIFIERS_INJECTED, "Identifiers written to source file",
            "file" => &file_path,
            "injected" => injected
        );

        Ok(true)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PY_SOURCE: &str = "import pytest\n\n\
def test_NEW_login(page):\n    \"\"\"\n    Description:\n    \"\"\"\n\n\
def test_gid_3_logout(page):\n    pass\n";

    #[test]
    fn test_dialect_lookup() {
        assert_eq!("robot".parse::<Dialect>(), Ok(Dialect::KeywordTable));
        assert_eq!("xframework".parse::<Dialect>(), Ok(Dialect::AnnotatedFunction));
        assert_eq!("Gherkin".parse::<Dialect>(), Ok(Dialect::FeatureScenario));
        assert!("cucumber".parse::<Dialect>().is_err());

        assert_eq!(Dialect::from_extension("feature"), Some(Dialect::FeatureScenario));
        assert_eq!(Dialect::from_extension("txt"), None);
        assert!(Dialect::AnnotatedFunction.matches_path(Path::new("suite/test_a.PY")));
    }

    #[test]
    fn test_marker_table() {
        let robot = Dialect::KeywordTable;
        assert_eq!(robot.add_start_marker(), "<NEW>");
        assert_eq!(robot.update_start_marker(), "TC-GID");
        assert_eq!(robot.placeholder(), "<NEW>");
        assert_eq!(Dialect::FeatureScenario.add_start_marker(), "Scenario: test_NEW");
        assert_eq!(Dialect::AnnotatedFunction.update_start_marker(), "def test_gid_");
    }

    #[test]
    fn test_inject_identifiers_is_idempotent() {
        let dialect = Dialect::AnnotatedFunction;
        let mut renames = RenameMap::new();
        renames.insert("tests/test_auth.py", "test_NEW_login", "test_gid_41_login");

        let first = dialect.inject_identifiers("/ci/tests/test_auth.py", PY_SOURCE, &mut renames);
        assert!(first.contains("def test_gid_41_login(page):"));
        assert!(!first.contains("test_NEW_login"));
        assert!(renames.is_empty());

        let second = dialect.inject_identifiers("/ci/tests/test_auth.py", &first, &mut renames);
        assert_eq!(second, first);
    }

    #[test]
    fn test_inject_leaves_unrelated_files_alone() {
        let mut renames = RenameMap::new();
        renames.insert("tests/other.py", "test_NEW_login", "test_gid_41_login");

        let text = Dialect::AnnotatedFunction.inject_identifiers(
            "/ci/tests/test_auth.py",
            PY_SOURCE,
            &mut renames,
        );
        assert_eq!(text, PY_SOURCE);
        assert_eq!(renames.pending_count(), 1);
    }

    #[test]
    fn test_inject_header_with_trailing_comment() {
        let text = "def test_NEW_login(page):  # see fixtures(page)\n    \"\"\"\n";
        let mut renames = RenameMap::new();
        renames.insert("tests/test_auth.py", "test_NEW_login", "test_gid_41_login");

        let rewritten =
            Dialect::AnnotatedFunction.inject_identifiers("tests/test_auth.py", text, &mut renames);
        assert_eq!(
            rewritten,
            "def test_gid_41_login(page):  # see fixtures(page)\n    \"\"\"\n"
        );
        assert!(renames.is_empty());
    }

    #[test]
    fn test_inject_keyword_table_preserves_crlf() {
        let text = "*** Test Cases ***\r\n<NEW>: Login\r\n    [Documentation]\r\n";
        let mut renames = RenameMap::new();
        renames.insert("suite/login.robot", "<NEW>: Login", "TC-GID-9: Login");

        let rewritten = Dialect::KeywordTable.inject_identifiers("suite/login.robot", text, &mut renames);
        assert_eq!(
            rewritten,
            "*** Test Cases ***\r\nTC-GID-9: Login\r\n    [Documentation]\r\n"
        );
    }

    #[test]
    fn test_rewrite_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let tests_dir = dir.path().join("tests");
        fs::create_dir(&tests_dir).unwrap();
        let file = tests_dir.join("checkout.feature");
        fs::write(&file, "Feature: cart\n  Scenario: test_NEW_checkout\n    \"\"\"\n").unwrap();

        let mut renames = RenameMap::new();
        renames.insert("tests/checkout.feature", "test_NEW_checkout", "test_gid_5_checkout");
        renames.insert("tests/checkout.feature", "test_NEW_missing", "test_gid_6_missing");

        let dialect = Dialect::FeatureScenario;
        assert!(dialect.rewrite_file(&file, &mut renames).unwrap());
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "Feature: cart\n  Scenario: test_gid_5_checkout\n    \"\"\"\n"
        );
        assert_eq!(renames.pending_count(), 1);
        assert!(renames.unmatched_report().unwrap().contains("test_NEW_missing"));

        assert!(!dialect.rewrite_file(&file, &mut renames).unwrap());
    }

    #[test]
    fn test_rewrite_missing_file() {
        let mut renames = RenameMap::new();
        renames.insert("tests/gone.py", "test_NEW_a", "test_gid_1_a");
        let result = Dialect::AnnotatedFunction.rewrite_file(Path::new("/nope/tests/gone.py"), &mut renames);
        assert!(matches!(result, Err(RenameError::Read { .. })));
        assert_eq!(renames.pending_count(), 1);
    }
}

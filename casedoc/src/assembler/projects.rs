//! `Projects:` trailer parsing

use crate::config::SyncConfig;
use crate::cursor::LineCursor;
use crate::dialect::Dialect;
use crate::grammar::{GrammarError, GrammarResult};
use crate::logging::codes;
use crate::model::TestCase;

const PROJECTS_LABEL: &str = "Projects:";
const NO_PROJECT: &str = "NA";

/// Non-fatal findings raised while assembling a case
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum AssemblyWarning {
    /// A keyword-table case listed only the default project
    OnlyDefaultProject { case: String, project: String },
}

impl AssemblyWarning {
    pub fn code(&self) -> crate::logging::Code {
        match self {
            AssemblyWarning::OnlyDefaultProject { .. } => codes::warnings::ONLY_DEFAULT_PROJECT,
        }
    }

    pub fn case_name(&self) -> &str {
        match self {
            AssemblyWarning::OnlyDefaultProject { case, .. } => case,
        }
    }
}

impl std::fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyWarning::OnlyDefaultProject { case, project } => write!(
                f,
                "You are ONLY adding test case {} to the default project: {}",
                case, project
            ),
        }
    }
}

/// Read the `Projects:` line and fill the case's project map
///
/// The default project is always added, except for keyword-table cases
/// that list nothing but the default project.
pub(super) fn read_projects(
    cursor: &mut LineCursor<'_>,
    case: &mut TestCase,
    config: &SyncConfig,
    dialect: Dialect,
) -> GrammarResult<Option<AssemblyWarning>> {
    let line = cursor.next_line_or_blank().trim();
    let scope = line
        .strip_prefix(PROJECTS_LABEL)
        .ok_or_else(|| GrammarError::missing_projects_line(case.name()))?;

    let projects: Vec<&str> = scope.split(',').map(str::trim).collect();
    let default = config.default_project.as_str();

    let mut warning = None;
    if dialect == Dialect::KeywordTable && projects == [default] {
        let only_default = AssemblyWarning::OnlyDefaultProject {
            case: case.name().to_string(),
            project: default.to_string(),
        };
        crate::log_warning!(code = only_default.code(), &only_default.to_string(),
            "case" => case.name()
        );
        warning = Some(only_default);
    } else {
        case.add_project(default);
    }

    for project in projects {
        if project.is_empty() || project == NO_PROJECT {
            return Err(GrammarError::empty_project_scope(case.name()));
        }
        if !config.is_known_project(project) {
            return Err(GrammarError::unknown_project(project, case.name()));
        }
        case.add_project(project);
    }

    Ok(warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> SyncConfig {
        SyncConfig::new("MASTER", &["TEAM_A", "TEAM_B"])
    }

    fn case() -> TestCase {
        TestCase::new("test_NEW_login", "NEW", "tests/test_auth.py")
    }

    #[test]
    fn test_default_project_is_added() {
        let mut cursor = LineCursor::new("Projects: TEAM_A, TEAM_B");
        let mut case = case();
        let warning =
            read_projects(&mut cursor, &mut case, &config(), Dialect::AnnotatedFunction).unwrap();

        assert!(warning.is_none());
        let names: Vec<&str> = case.project_names().collect();
        assert_eq!(names, vec!["MASTER", "TEAM_A", "TEAM_B"]);
    }

    #[test]
    fn test_keyword_table_only_default_warns() {
        let mut cursor = LineCursor::new("Projects: MASTER");
        let mut case = case();
        let warning = read_projects(&mut cursor, &mut case, &config(), Dialect::KeywordTable)
            .unwrap()
            .unwrap();

        assert_eq!(warning.case_name(), "test_NEW_login");
        assert_eq!(warning.code(), codes::warnings::ONLY_DEFAULT_PROJECT);
        assert_eq!(case.project_names().collect::<Vec<_>>(), vec!["MASTER"]);
    }

    #[test]
    fn test_other_dialects_do_not_warn_on_default_only() {
        let mut cursor = LineCursor::new("Projects: MASTER");
        let mut case = case();
        let warning =
            read_projects(&mut cursor, &mut case, &config(), Dialect::FeatureScenario).unwrap();
        assert!(warning.is_none());
        assert_eq!(case.projects().len(), 1);
    }

    #[test]
    fn test_project_line_errors() {
        let mut cursor = LineCursor::new("Scope: TEAM_A");
        assert_matches!(
            read_projects(&mut cursor, &mut case(), &config(), Dialect::AnnotatedFunction),
            Err(GrammarError::MissingProjectsLine { .. })
        );

        let mut cursor = LineCursor::new("Projects: NA");
        assert_matches!(
            read_projects(&mut cursor, &mut case(), &config(), Dialect::AnnotatedFunction),
            Err(GrammarError::EmptyProjectScope { .. })
        );

        let mut cursor = LineCursor::new("Projects: TEAM_A,");
        assert_matches!(
            read_projects(&mut cursor, &mut case(), &config(), Dialect::AnnotatedFunction),
            Err(GrammarError::EmptyProjectScope { .. })
        );

        let mut cursor = LineCursor::new("Projects: TEAM_Z");
        let err = read_projects(&mut cursor, &mut case(), &config(), Dialect::AnnotatedFunction)
            .unwrap_err();
        assert!(err.to_string().starts_with("'Projects:' line has a project 'TEAM_Z'"));
    }
}

//! TestCase, Step and per-project tracking records

use crate::config::SyncConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One step triad; built once by the assembler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub description: String,
    pub expected_result: String,
    pub notes: String,
}

impl Step {
    pub fn new(description: String, expected_result: String, notes: String) -> Self {
        Self {
            description,
            expected_result,
            notes,
        }
    }
}

/// Whether a project's copy matches the default project's copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    InSync,
    OutOfSync,
}

/// Backend tracking for one project; `test_case_id` is `None` until the
/// case exists in that project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTrack {
    pub project_id: u64,
    pub test_case_id: Option<u64>,
    pub parent_id: u64,
    pub sync_status: Option<SyncStatus>,
}

impl ProjectTrack {
    pub fn new(project_id: u64, test_case_id: Option<u64>, parent_id: u64) -> Self {
        Self {
            project_id,
            test_case_id,
            parent_id,
            sync_status: None,
        }
    }
}

/// Reasons a TestCase violates its invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestCaseError {
    #[error("Test case has an empty name")]
    EmptyName,

    #[error("Test case {case} has no steps")]
    NoSteps { case: String },

    #[error("Test case {case} is not scoped to any project")]
    NoProjects { case: String },

    #[error("Test case {case} lists project '{project}' outside the sync configuration")]
    UnknownProject { case: String, project: String },
}

impl TestCaseError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::grammar::INVALID_TEST_CASE
    }
}

/// A documented test procedure ready for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    name: String,
    global_id: String,
    parent_folder_path: String,
    description: String,
    prerequisites: String,
    test_data: String,
    steps: Vec<Step>,
    projects: BTreeMap<String, Option<ProjectTrack>>,
}

impl TestCase {
    pub fn new(name: &str, global_id: &str, parent_folder_path: &str) -> Self {
        Self {
            name: name.to_string(),
            global_id: global_id.to_string(),
            parent_folder_path: parent_folder_path.to_string(),
            description: String::new(),
            prerequisites: String::new(),
            test_data: String::new(),
            steps: Vec::new(),
            projects: BTreeMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Assembly-time mutation
    // ------------------------------------------------------------------

    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    pub(crate) fn set_prerequisites(&mut self, prerequisites: String) {
        self.prerequisites = prerequisites;
    }

    pub(crate) fn set_test_data(&mut self, test_data: String) {
        self.test_data = test_data;
    }

    pub(crate) fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(crate) fn add_project(&mut self, project: &str) {
        self.projects.entry(project.to_string()).or_insert(None);
    }

    // ------------------------------------------------------------------
    // Post-assembly mutation
    // ------------------------------------------------------------------

    /// Rename after the backend issued a global id
    pub fn assign_global_id(&mut self, new_name: &str, global_id: &str) {
        self.name = new_name.to_string();
        self.global_id = global_id.to_string();
    }

    /// Attach tracking data; returns false when the case is not scoped to `project`
    pub fn set_project_track(&mut self, project: &str, track: ProjectTrack) -> bool {
        match self.projects.get_mut(project) {
            Some(slot) => {
                *slot = Some(track);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn global_id(&self) -> &str {
        &self.global_id
    }

    pub fn parent_folder_path(&self) -> &str {
        &self.parent_folder_path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn prerequisites(&self) -> &str {
        &self.prerequisites
    }

    pub fn test_data(&self) -> &str {
        &self.test_data
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn projects(&self) -> &BTreeMap<String, Option<ProjectTrack>> {
        &self.projects
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    pub fn project_track(&self, project: &str) -> Option<&ProjectTrack> {
        self.projects.get(project).and_then(Option::as_ref)
    }

    /// Project whose tracking record carries `project_id`
    pub fn project_name_for_id(&self, project_id: u64) -> Option<&str> {
        self.projects.iter().find_map(|(name, track)| {
            track
                .as_ref()
                .filter(|t| t.project_id == project_id)
                .map(|_| name.as_str())
        })
    }

    pub fn validate(&self, config: &SyncConfig) -> Result<(), TestCaseError> {
        if self.name.trim().is_empty() {
            return Err(TestCaseError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(TestCaseError::NoSteps {
                case: self.name.clone(),
            });
        }
        if self.projects.is_empty() {
            return Err(TestCaseError::NoProjects {
                case: self.name.clone(),
            });
        }
        if let Some(project) = self.project_names().find(|p| !config.is_known_project(p)) {
            return Err(TestCaseError::UnknownProject {
                case: self.name.clone(),
                project: project.to_string(),
            });
        }
        Ok(())
    }
}

const RULE: &str = "********************************************************************************";

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "{}", self.name)?;
        writeln!(f, "---Global ID---\n{}", self.global_id)?;
        writeln!(f, "---Folder---\n{}", self.parent_folder_path)?;
        writeln!(f, "---Description---\n{}", self.description.trim())?;
        writeln!(
            f,
            "---Prerequisites---\n{}",
            self.prerequisites.trim().replace("\n\n", "\n")
        )?;
        writeln!(
            f,
            "---Test Data---\n{}",
            self.test_data.trim().replace("\n\n", "\n")
        )?;

        writeln!(f, "---Steps---")?;
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "  {}) {}", index + 1, step.description)?;
            writeln!(f, "      ER: {}", step.expected_result)?;
            writeln!(f, "      Notes: {}", step.notes)?;
        }

        writeln!(f, "---Projects---")?;
        for (project, track) in &self.projects {
            match track {
                Some(track) => writeln!(
                    f,
                    "{} (id: {}) (parent_id: {})",
                    project,
                    track
                        .test_case_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    track.parent_id
                )?,
                None => writeln!(f, "{} (NO TEST CASE IN THIS PROJECT)", project)?,
            }
        }

        write!(f, "{}", RULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample_case() -> TestCase {
        let mut case = TestCase::new("test_NEW_login", "NEW", "suite/auth/test_login.py");
        case.set_description("\nLogs in".to_string());
        case.add_step(Step::new(
            "Open page".to_string(),
            "Page shown".to_string(),
            String::new(),
        ));
        case.add_project("TEAM_A");
        case.add_project("MASTER");
        case.add_project("TEAM_A");
        case
    }

    #[test]
    fn test_projects_are_unique() {
        let case = sample_case();
        assert_eq!(case.project_names().collect::<Vec<_>>(), vec!["MASTER", "TEAM_A"]);
        assert!(case.project_track("TEAM_A").is_none());
    }

    #[test]
    fn test_validate() {
        let config = SyncConfig::new("MASTER", &["TEAM_A"]);
        assert!(sample_case().validate(&config).is_ok());

        let narrow = SyncConfig::new("MASTER", &["TEAM_B"]);
        assert_matches!(
            sample_case().validate(&narrow),
            Err(TestCaseError::UnknownProject { ref project, .. }) if project == "TEAM_A"
        );

        let bare = TestCase::new("test_NEW_empty", "NEW", "suite");
        assert_matches!(bare.validate(&config), Err(TestCaseError::NoSteps { .. }));
    }

    #[test]
    fn test_assign_global_id_and_tracking() {
        let mut case = sample_case();
        case.assign_global_id("test_gid_42_login", "GID-42");
        assert_eq!(case.name(), "test_gid_42_login");
        assert_eq!(case.global_id(), "GID-42");

        assert!(case.set_project_track("TEAM_A", ProjectTrack::new(7, Some(1001), 55)));
        assert!(!case.set_project_track("TEAM_Z", ProjectTrack::new(8, None, 1)));
        assert_eq!(case.project_name_for_id(7), Some("TEAM_A"));
        assert_eq!(case.project_name_for_id(8), None);
    }

    #[test]
    fn test_display_and_serde() {
        let case = sample_case();
        let rendered = case.to_string();
        assert!(rendered.contains("---Global ID---\nNEW"));
        assert!(rendered.contains("  1) Open page"));
        assert!(rendered.contains("MASTER (NO TEST CASE IN THIS PROJECT)"));

        let json = serde_json::to_string(&case).unwrap();
        let back: TestCase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, case);
    }
}

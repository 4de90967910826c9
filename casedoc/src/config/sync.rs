//! Sync configuration threaded into the assembler and batch driver
//!
//! Loaded once by the caller from a TOML document such as:
//!
//! ```toml
//! default_project = "MASTER"
//! project_list = ["TEAM_A", "TEAM_B"]
//! root_path = "/work/tests"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read sync configuration '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid sync configuration: {message}")]
    Parse { message: String },

    #[error("Sync configuration requires a non-empty default_project")]
    EmptyDefaultProject,

    #[error("Project '{project}' is listed more than once in project_list")]
    DuplicateProject { project: String },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::configuration::INVALID_SYNC_CONFIG
    }
}

/// Project allow-list, default project and root path for one sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Project every case is added to (the master project)
    pub default_project: String,

    /// Projects an author may list on a `Projects:` line
    #[serde(default)]
    pub project_list: Vec<String>,

    /// Root of the test tree; its last component anchors parent folder paths
    #[serde(default)]
    pub root_path: Option<PathBuf>,
}

impl SyncConfig {
    pub fn new(default_project: &str, project_list: &[&str]) -> Self {
        Self {
            default_project: default_project.to_string(),
            project_list: project_list.iter().map(|p| p.to_string()).collect(),
            root_path: None,
        }
    }

    pub fn with_root_path(mut self, root_path: impl Into<PathBuf>) -> Self {
        self.root_path = Some(root_path.into());
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content)?;

        crate::log_info!("Sync configuration loaded",
            "path" => path.display(),
            "default_project" => &config.default_project,
            "projects" => config.project_list.len()
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_project.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultProject);
        }

        let mut seen = HashSet::new();
        for project in &self.project_list {
            if !seen.insert(project.as_str()) {
                return Err(ConfigError::DuplicateProject {
                    project: project.clone(),
                });
            }
        }

        Ok(())
    }

    /// Allow-list membership; the default project is always accepted
    pub fn is_known_project(&self, project: &str) -> bool {
        project == self.default_project || self.project_list.iter().any(|p| p == project)
    }
}

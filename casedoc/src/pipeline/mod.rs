mod error;
mod result;

// Re-export public types
pub use error::PipelineError;
pub use result::PipelineResult;

use crate::assembler::{Assembler, SyncMode};
use crate::config::SyncConfig;
use crate::dialect::Dialect;
use crate::file_processor::{parent_folder_path, root_folder_name, FileProcessor};
use crate::logging;
use std::path::Path;
use std::time::Instant;

/// Per-file driver: read -> filter -> parent folder path -> assemble
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    config: &'a SyncConfig,
    dialect: Dialect,
    mode: SyncMode,
    processor: FileProcessor,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a SyncConfig, dialect: Dialect, mode: SyncMode) -> Self {
        Self {
            config,
            dialect,
            mode,
            processor: FileProcessor::for_dialect(dialect),
        }
    }

    pub fn with_processor(mut self, processor: FileProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn process_file(&self, path: &Path) -> Result<PipelineResult, PipelineError> {
        self.process_file_with_id(path, 0)
    }

    /// Process one file under its own logging context
    pub fn process_file_with_id(
        &self,
        path: &Path,
        file_id: usize,
    ) -> Result<PipelineResult, PipelineError> {
        let start_time = Instant::now();
        let file = path.display().to_string();

        logging::with_file_context(path.to_path_buf(), file_id, || -> Result<_, PipelineError> {
            crate::log_info!("Extracting documentation",
                "file" => &file,
                "dialect" => self.dialect,
                "want_add" => self.mode.want_add,
                "want_update" => self.mode.want_update
            );

            // Stage 1: Bounded read
            let file_result = self.processor.process_file(path)?;

            // Stage 2: Folder path relative to the configured root
            let parent = resolve_parent_folder_path(self.config, path)?;

            // Stage 3: Dialect filtering
            let block = self
                .dialect
                .filter_documentation_block(&file_result.source)
                .inspect_err(|e| crate::log_error!(e.error_code(), &e.to_string()))?;

            // Stage 4: Assembly
            let cases = Assembler::new(self.config, self.dialect).assemble(&block, &parent, self.mode)?;

            let result = PipelineResult::new(cases, file_result.metadata, parent, start_time.elapsed());
            result.log_success(&file);

            Ok(result)
        })
    }
}

/// Process one file with the default file processor for `dialect`
pub fn process_file(
    path: &Path,
    dialect: Dialect,
    mode: SyncMode,
    config: &SyncConfig,
) -> Result<PipelineResult, PipelineError> {
    Pipeline::new(config, dialect, mode).process_file(path)
}

/// Folder path recorded on each case
///
/// With a configured root the path starts at the root's last component;
/// without one the file path is used as given.
pub fn resolve_parent_folder_path(config: &SyncConfig, path: &Path) -> Result<String, PipelineError> {
    let Some(root) = &config.root_path else {
        return Ok(path.display().to_string().replace('\\', "/"));
    };

    parent_folder_path(root, path).ok_or_else(|| {
        let error = PipelineError::RootFolderNotFound {
            root: root_folder_name(root).unwrap_or_default().to_string(),
            path: path.display().to_string(),
        };
        crate::log_error!(error.error_code(), &error.to_string());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarError;
    use assert_matches::assert_matches;
    use std::fs;

    const CASE: &str = "\
def test_NEW_login(page):
    \"\"\"
    Description:
    Logs in

    Prerequisites: NA

    Test Data: NA

    Steps:
    1) Open the page
    ER: Page opens
    Notes: none

    Projects: TEAM_A
    \"\"\"
    page.goto('/')
";

    fn workspace() -> (tempfile::TempDir, SyncConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        fs::create_dir_all(root.join("auth")).unwrap();
        let config = SyncConfig::new("MASTER", &["TEAM_A"]).with_root_path(&root);
        (dir, config)
    }

    #[test]
    fn test_process_file_end_to_end() {
        let (dir, config) = workspace();
        let path = dir.path().join("suite/auth/test_login.py");
        fs::write(&path, CASE).unwrap();

        let result = process_file(&path, Dialect::AnnotatedFunction, SyncMode::add_only(), &config)
            .unwrap();

        assert_eq!(result.parent_folder_path, "suite/auth/test_login.py");
        assert_eq!(result.case_count(), 1);
        assert_eq!(result.cases.added[0].parent_folder_path(), "suite/auth/test_login.py");
        assert_eq!(result.file_metadata.line_count, CASE.lines().count());
    }

    #[test]
    fn test_root_folder_must_be_in_path() {
        let (dir, config) = workspace();
        let path = dir.path().join("elsewhere.py");
        fs::write(&path, CASE).unwrap();

        let err = process_file(&path, Dialect::AnnotatedFunction, SyncMode::validation(), &config)
            .unwrap_err();
        assert_matches!(&err, PipelineError::RootFolderNotFound { root, .. } if root == "suite");
        assert!(err
            .to_string()
            .ends_with("The path must follow the root folder"));
    }

    #[test]
    fn test_grammar_error_surfaces_case() {
        let (dir, config) = workspace();
        let path = dir.path().join("suite/test_bad.py");
        fs::write(&path, CASE.replace("Projects: TEAM_A", "Projects: TEAM_Q")).unwrap();

        let err = process_file(&path, Dialect::AnnotatedFunction, SyncMode::validation(), &config)
            .unwrap_err();
        assert_matches!(err, PipelineError::Grammar(GrammarError::UnknownProject { .. }));
        assert_eq!(err.case_name(), Some("test_NEW_login"));
        assert!(err.requires_halt());
    }

    #[test]
    fn test_empty_file_is_recoverable() {
        let (dir, config) = workspace();
        let path = dir.path().join("suite/test_empty.py");
        fs::write(&path, "").unwrap();

        let err = process_file(&path, Dialect::AnnotatedFunction, SyncMode::validation(), &config)
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_parent_path_without_root() {
        let config = SyncConfig::new("MASTER", &[]);
        let path = Path::new("suite/auth/test_login.py");
        assert_eq!(
            resolve_parent_folder_path(&config, path).unwrap(),
            "suite/auth/test_login.py"
        );
    }
}

//! Directory-wide extraction and identifier injection
//!
//! Discovers every source file of the selected dialect under a directory,
//! runs the per-file pipeline on each (sequentially or on scoped worker
//! threads) and merges the cases. A failing file never contributes a
//! partial case list and never stops its siblings unless fail-fast is set.

use crate::assembler::ParsedCases;
use crate::config::compile_time::{assembly::MAX_CASES_PER_RUN, batch_processing};
use crate::config::BatchPreferences;
use crate::dialect::{Dialect, RenameError, RenameMap};
use crate::logging::{codes, Code};
use crate::pipeline::{Pipeline, PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub parallel: bool,
    /// Soft cap; discovery stops with a warning once reached
    pub max_files: Option<usize>,
    pub fail_fast: bool,
}

impl BatchConfig {
    pub fn from_preferences(prefs: &BatchPreferences) -> Self {
        Self {
            recursive: prefs.recursive,
            parallel: prefs.parallel,
            fail_fast: prefs.fail_fast,
            ..Self::default()
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(batch_processing::MAX_WORKER_THREADS))
                .unwrap_or(1),
            recursive: true,
            parallel: false,
            max_files: None,
            fail_fast: false,
        }
    }
}

/// Batch processing results
#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    /// Files rejected with a recoverable error, e.g. empty files
    pub skipped_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn case_count(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.case_count())
            .sum()
    }

    /// Cases from every successful file, in discovery order
    pub fn cases(&self) -> ParsedCases {
        let mut cases = ParsedCases::default();
        for (_, result) in &self.successful_files {
            cases.merge(result.cases.clone());
        }
        cases
    }

    fn record(&mut self, file_path: PathBuf, outcome: Result<PipelineResult, PipelineError>) {
        self.files_processed += 1;
        match outcome {
            Ok(result) => self.successful_files.push((file_path, result)),
            Err(error) if error.is_recoverable() => {
                crate::log_warning!("Skipping file",
                    "file" => file_path.display(),
                    "reason" => &error
                );
                self.skipped_files.push((file_path, error));
            }
            Err(error) => {
                crate::log_error!(error.error_code(), "File contributes no test cases",
                    "file" => file_path.display(),
                    "error" => &error
                );
                self.failed_files.push((file_path, error));
            }
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {} skipped, {} test cases, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.skipped_files.len(),
            self.case_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

/// Batch processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No .{extension} files found in directory: {path}")]
    NoFilesFound { path: String, extension: &'static str },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error(
        "Attempting to add/update more than {max} test cases at once, please limit the scope to less test cases"
    )]
    TooManyCases { max: usize, found: usize },

    #[error("IO error during directory traversal: {error}")]
    TraversalError { error: String },

    #[error("Thread pool error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            Self::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            Self::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            Self::TooManyCases { .. } => codes::batch::TOO_MANY_CASES,
            Self::TraversalError { .. } => codes::batch::TRAVERSAL_ERROR,
            Self::ThreadError { .. } => codes::batch::THREAD_ERROR,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Files with the dialect's extension under `dir_path`, sorted
pub fn discover_files(
    dir_path: &Path,
    dialect: Dialect,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "extension" => dialect.file_extension(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        let error = BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), &error.to_string());
        return Err(error);
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir_path)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| BatchError::TraversalError {
            error: e.to_string(),
        })?;

        if !entry.file_type().is_file() || !dialect.matches_path(entry.path()) {
            continue;
        }

        files.push(entry.into_path());

        if files.len() > batch_processing::MAX_FILES_PER_BATCH {
            let error = BatchError::TooManyFiles {
                count: files.len(),
                max: batch_processing::MAX_FILES_PER_BATCH,
            };
            crate::log_error!(error.error_code(), &error.to_string(),
                "directory" => dir_path.display()
            );
            return Err(error);
        }

        if config.max_files.is_some_and(|max| files.len() >= max) {
            crate::log_warning!(code = codes::warnings::FILE_LIMIT_REACHED,
                "Reached maximum file limit",
                "files_found" => files.len()
            );
            break;
        }
    }

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
            extension: dialect.file_extension(),
        });
    }

    crate::log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Runs one pipeline over many files
pub struct BatchProcessor<'a> {
    pipeline: Pipeline<'a>,
    config: BatchConfig,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(pipeline: Pipeline<'a>, config: BatchConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Discover and process every dialect file under `dir_path`
    pub fn process_directory(&self, dir_path: &Path) -> Result<BatchResults, BatchError> {
        let files = discover_files(dir_path, self.pipeline.dialect(), &self.config)?;
        self.process_files(&files)
    }

    /// Process an explicit file list and enforce the per-run case limit
    pub fn process_files(&self, files: &[PathBuf]) -> Result<BatchResults, BatchError> {
        let start_time = Instant::now();

        let mut results = if self.config.parallel && self.config.max_threads > 1 {
            self.process_parallel(files)?
        } else {
            self.process_sequential(files)
        };
        results.files_discovered = files.len();
        results.processing_duration = start_time.elapsed();

        crate::log_success!(
            codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Batch processing completed",
            "files_processed" => results.files_processed,
            "successful" => results.success_count(),
            "failed" => results.failure_count(),
            "skipped" => results.skipped_files.len(),
            "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
        );

        self.enforce_case_limit(&results)?;
        Ok(results)
    }

    fn enforce_case_limit(&self, results: &BatchResults) -> Result<(), BatchError> {
        let found = results.case_count();
        if self.pipeline.mode().is_validation() || found <= MAX_CASES_PER_RUN {
            return Ok(());
        }

        let error = BatchError::TooManyCases {
            max: MAX_CASES_PER_RUN,
            found,
        };
        crate::log_error!(error.error_code(), &error.to_string(), "found" => found);
        Err(error)
    }

    fn process_sequential(&self, files: &[PathBuf]) -> BatchResults {
        let mut results = BatchResults::new();

        for (file_id, file_path) in files.iter().enumerate() {
            let outcome = self.pipeline.process_file_with_id(file_path, file_id);
            let failed = outcome.as_ref().is_err_and(|e| !e.is_recoverable());
            results.record(file_path.clone(), outcome);

            if failed && self.config.fail_fast {
                crate::log_warning!("Fail-fast mode enabled, stopping batch processing");
                break;
            }
        }

        results
    }

    /// Files are split into chunks; each chunk is shared across scoped
    /// workers and results are recorded in input order
    fn process_parallel(&self, files: &[PathBuf]) -> Result<BatchResults, BatchError> {
        let mut results = BatchResults::new();
        let threads = self.config.max_threads.max(1);
        let slice_size = calculate_chunk_size(files.len(), threads);

        crate::log_debug!("Parallel processing configuration",
            "total_files" => files.len(),
            "slice_size" => slice_size,
            "threads" => threads
        );

        for (chunk_index, chunk) in files.chunks(slice_size * threads).enumerate() {
            let base = chunk_index * slice_size * threads;

            let outcomes = thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .chunks(slice_size)
                    .enumerate()
                    .map(|(slot, slice)| {
                        let offset = base + slot * slice_size;
                        scope.spawn(move || {
                            slice
                                .iter()
                                .enumerate()
                                .map(|(i, path)| {
                                    (path, self.pipeline.process_file_with_id(path, offset + i))
                                })
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| handle.join())
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(|_| {
                let error = BatchError::ThreadError {
                    message: "Worker thread panicked during processing".to_string(),
                };
                crate::log_error!(error.error_code(), &error.to_string());
                error
            })?;

            for (path, outcome) in outcomes.into_iter().flatten() {
                results.record(path.clone(), outcome);
            }

            if self.config.fail_fast && results.failure_count() > 0 {
                crate::log_warning!("Fail-fast mode enabled, stopping batch processing");
                break;
            }
        }

        Ok(results)
    }
}

/// Files per worker, clamped to keep chunks bounded
fn calculate_chunk_size(total_files: usize, max_threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 50;

    let ideal_chunk_size = total_files.div_ceil(max_threads.max(1));
    ideal_chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

// ============================================================================
// IDENTIFIER INJECTION
// ============================================================================

/// Write issued identifiers into every file that has pending renames
///
/// Returns the files that changed. Entries left in `renames` afterwards
/// were not found and are reported as a warning.
pub fn inject_identifiers_into_files(
    dialect: Dialect,
    files: &[PathBuf],
    renames: &mut RenameMap,
) -> Result<Vec<PathBuf>, RenameError> {
    let mut rewritten = Vec::new();

    for file in files {
        if renames.is_empty() {
            break;
        }
        if dialect.rewrite_file(file, renames)? {
            rewritten.push(file.clone());
        }
    }

    if let Some(report) = renames.unmatched_report() {
        crate::log_warning!(code = codes::warnings::UNMATCHED_RENAMES, &report,
            "pending" => renames.pending_count()
        );
    }

    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SyncMode;
    use crate::config::SyncConfig;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn case_source(name: &str, project: &str) -> String {
        format!(
            "def {}(page):\n    \"\"\"\n    Description:\n    Does a thing\n\n    Prerequisites: NA\n\n    Test Data: NA\n\n    Steps:\n    1) Act\n    ER: Done\n    Notes: none\n\n    Projects: {}\n    \"\"\"\n",
            name, project
        )
    }

    fn config(root: &Path) -> SyncConfig {
        SyncConfig::new("MASTER", &["TEAM_A"]).with_root_path(root)
    }

    #[test]
    fn test_discovery_filters_by_dialect_extension() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("b_test.py"), "x").unwrap();
        fs::write(root.join("a_test.py"), "x").unwrap();
        fs::write(root.join("nested/c_test.py"), "x").unwrap();
        fs::write(root.join("login.robot"), "x").unwrap();

        let files = discover_files(root, Dialect::AnnotatedFunction, &BatchConfig::default()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a_test.py", "b_test.py", "c_test.py"]);

        let shallow = BatchConfig {
            recursive: false,
            ..BatchConfig::default()
        };
        assert_eq!(discover_files(root, Dialect::AnnotatedFunction, &shallow).unwrap().len(), 2);

        assert_matches!(
            discover_files(root, Dialect::FeatureScenario, &shallow),
            Err(BatchError::NoFilesFound { extension: "feature", .. })
        );
        assert_matches!(
            discover_files(&root.join("missing"), Dialect::FeatureScenario, &shallow),
            Err(BatchError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_failing_file_is_isolated() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("suite");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("test_a.py"), case_source("test_NEW_a", "TEAM_A")).unwrap();
        fs::write(root.join("test_b.py"), case_source("test_NEW_b", "UNKNOWN")).unwrap();
        fs::write(root.join("test_c.py"), case_source("test_NEW_c", "TEAM_A")).unwrap();
        fs::write(root.join("test_empty.py"), "").unwrap();

        let sync = config(&root);
        for parallel in [false, true] {
            let batch = BatchConfig {
                parallel,
                max_threads: 2,
                ..BatchConfig::default()
            };
            let pipeline = Pipeline::new(&sync, Dialect::AnnotatedFunction, SyncMode::add_only());
            let results = BatchProcessor::new(pipeline, batch)
                .process_directory(&root)
                .unwrap();

            assert_eq!(results.files_processed, 4);
            assert_eq!(results.success_count(), 2);
            assert_eq!(results.failure_count(), 1);
            assert_eq!(results.skipped_files.len(), 1);
            assert!(results.failed_files[0].0.ends_with("test_b.py"));

            let names: Vec<_> = results.cases().added.iter().map(|c| c.name().to_string()).collect();
            assert_eq!(names, vec!["test_NEW_a", "test_NEW_c"]);
        }
    }

    #[test]
    fn test_fail_fast_stops_sequential_batch() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("suite");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("test_a.py"), case_source("test_NEW_a", "NOPE")).unwrap();
        fs::write(root.join("test_b.py"), case_source("test_NEW_b", "TEAM_A")).unwrap();

        let sync = config(&root);
        let batch = BatchConfig {
            fail_fast: true,
            ..BatchConfig::default()
        };
        let pipeline = Pipeline::new(&sync, Dialect::AnnotatedFunction, SyncMode::validation());
        let results = BatchProcessor::new(pipeline, batch).process_directory(&root).unwrap();

        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_case_limit_enforced() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("suite");
        fs::create_dir(&root).unwrap();

        let source: String = (0..=MAX_CASES_PER_RUN)
            .map(|i| case_source(&format!("test_NEW_case_{}", i), "TEAM_A"))
            .collect::<Vec<_>>()
            .join("\n");
        fs::write(root.join("test_many.py"), source).unwrap();

        let sync = config(&root);
        let pipeline = Pipeline::new(&sync, Dialect::AnnotatedFunction, SyncMode::add_only());
        let err = BatchProcessor::new(pipeline, BatchConfig::default())
            .process_directory(&root)
            .unwrap_err();

        assert_matches!(err, BatchError::TooManyCases { found, .. } if found == MAX_CASES_PER_RUN + 1);
        assert!(err
            .to_string()
            .starts_with(&format!("Attempting to add/update more than {} test cases", MAX_CASES_PER_RUN)));

        let pipeline = Pipeline::new(&sync, Dialect::AnnotatedFunction, SyncMode::validation());
        let results = BatchProcessor::new(pipeline, BatchConfig::default())
            .process_directory(&root)
            .unwrap();
        assert_eq!(results.case_count(), MAX_CASES_PER_RUN + 1);
    }

    #[test]
    fn test_inject_identifiers_into_files() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().join("suite");
        fs::create_dir(&root).unwrap();
        let file_a = root.join("test_a.py");
        let file_b = root.join("test_b.py");
        fs::write(&file_a, case_source("test_NEW_a", "TEAM_A")).unwrap();
        fs::write(&file_b, case_source("test_NEW_b", "TEAM_A")).unwrap();

        let mut renames = RenameMap::new();
        renames.insert("suite/test_a.py", "test_NEW_a", "test_gid_10_a");
        renames.insert("suite/test_b.py", "test_NEW_zzz", "test_gid_11_zzz");

        let changed = inject_identifiers_into_files(
            Dialect::AnnotatedFunction,
            &[file_a.clone(), file_b.clone()],
            &mut renames,
        )
        .unwrap();

        assert_eq!(changed, vec![file_a.clone()]);
        assert!(fs::read_to_string(&file_a).unwrap().contains("def test_gid_10_a(page):"));
        assert_eq!(
            fs::read_to_string(&file_b).unwrap(),
            case_source("test_NEW_b", "TEAM_A")
        );
        assert_eq!(renames.pending_count(), 1);
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(100, 4), 25);
        assert_eq!(calculate_chunk_size(10, 4), 3);
        assert_eq!(calculate_chunk_size(1, 4), 1);
        assert_eq!(calculate_chunk_size(0, 4), 1);
        assert_eq!(calculate_chunk_size(200, 4), 50);
    }

    #[test]
    fn test_error_codes() {
        let error = BatchError::TooManyCases { max: 30, found: 31 };
        assert_eq!(error.error_code(), codes::batch::TOO_MANY_CASES);
        assert!(error.requires_halt());
    }
}

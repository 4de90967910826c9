//! Bounded source-file reading with coded errors

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::dialect::Dialect;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .{expected}, found {found:?}")]
    InvalidExtension {
        expected: &'static str,
        found: Option<String>,
    },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error on '{path}': {message}")]
    IoError { path: String, message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub(crate) fn from_io(path: &Path, error: &std::io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::InvalidData => Self::InvalidEncoding { path },
            _ => Self::IoError {
                path,
                message: error.to_string(),
            },
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::EmptyFile { .. } => codes::file_processing::EMPTY_FILE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
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

    /// Recoverable errors (empty file, wrong extension) let a batch skip the file
    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

/// Metadata collected while reading a source file
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable(self.size)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

fn human_readable(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// Reads source files under the compile-time size and line limits
#[derive(Debug, Clone)]
pub struct FileProcessor {
    /// Extension the file must carry when `require_extension` is set
    pub expected_extension: Option<&'static str>,
    pub require_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            expected_extension: None,
            require_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::from_preferences(&FileProcessorPreferences::default(), dialect)
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences, dialect: Dialect) -> Self {
        Self {
            expected_extension: Some(dialect.file_extension()),
            require_extension: prefs.require_dialect_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_extension_required(mut self, required: bool) -> Self {
        self.require_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn process_file(&self, path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file = path.display().to_string();

        log_debug!("Starting file processing", "file" => &file);

        let metadata = self.collect_metadata(path).inspect_err(|error| {
            log_error!(error.error_code(), "Failed to inspect file", "file" => &file, "error" => error);
        })?;

        self.validate(&metadata).inspect_err(|error| {
            log_error!(error.error_code(), "File rejected", "file" => &file, "error" => error);
        })?;

        let source = fs::read_to_string(path)
            .map_err(|e| FileProcessorError::from_io(path, &e))
            .inspect_err(|error| {
                log_error!(error.error_code(), "Failed to read file", "file" => &file, "error" => error);
            })?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            let error = FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => &file,
                "lines" => line_count,
                "max_lines" => MAX_LINE_COUNT
            );
            return Err(error);
        }

        let result = FileProcessingResult {
            source,
            metadata: FileMetadata {
                line_count,
                ..metadata
            },
            processing_duration: start_time.elapsed(),
        };

        if self.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "File read",
                "file" => &file,
                "size" => result.metadata.human_readable_size(),
                "lines" => line_count,
                "large_file" => result.metadata.is_large_file(),
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
            );
        }

        Ok(result)
    }

    fn collect_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        if path.as_os_str().is_empty() {
            return Err(FileProcessorError::InvalidPath {
                path: String::new(),
            });
        }

        let metadata = fs::metadata(path).map_err(|e| FileProcessorError::from_io(path, &e))?;
        if !metadata.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension: path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_lowercase()),
            line_count: 0,
            modified: metadata.modified().ok(),
        })
    }

    fn validate(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }

        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile {
                path: metadata.path.display().to_string(),
            });
        }

        if let (true, Some(expected)) = (self.require_extension, self.expected_extension) {
            if metadata.extension.as_deref() != Some(expected) {
                return Err(FileProcessorError::InvalidExtension {
                    expected,
                    found: metadata.extension.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_source(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_valid_file() {
        let file = temp_source(".py", "def test_NEW_a():\n    pass\n");
        let processor = FileProcessor::for_dialect(Dialect::AnnotatedFunction);
        let result = processor.process_file(file.path()).unwrap();

        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.extension.as_deref(), Some("py"));
        assert!(!result.is_effectively_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = FileProcessor::new().process_file(Path::new("/no/such/file.py"));
        assert_matches!(result, Err(FileProcessorError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path());
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_empty_file_is_recoverable() {
        let file = temp_source(".py", "");
        let error = FileProcessor::new().process_file(file.path()).unwrap_err();
        assert_matches!(error, FileProcessorError::EmptyFile { .. });
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_extension_requirement() {
        let file = temp_source(".txt", "content");
        let strict = FileProcessor::for_dialect(Dialect::KeywordTable).with_extension_required(true);
        assert_matches!(
            strict.process_file(file.path()),
            Err(FileProcessorError::InvalidExtension { expected: "robot", .. })
        );

        let lenient = strict.with_extension_required(false);
        assert!(lenient.process_file(file.path()).is_ok());
    }

    #[test]
    fn test_too_many_lines() {
        let content = "x\n".repeat(MAX_LINE_COUNT + 1);
        if (content.len() as u64) > MAX_FILE_SIZE {
            return;
        }
        let file = temp_source(".feature", &content);
        assert_matches!(
            FileProcessor::new().process_file(file.path()),
            Err(FileProcessorError::TooManyLines { .. })
        );
    }

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable(512), "512 B");
        assert_eq!(human_readable(2048), "2.00 KB");
    }
}

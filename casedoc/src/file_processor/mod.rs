//! Source-file access: bounded reads, path derivation and atomic rewrites

mod atomic;
mod paths;
mod processor;

pub use atomic::write_atomic;
pub use paths::{parent_folder_path, root_folder_name, sanitize_path};
pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

use crate::config::runtime::FileProcessorPreferences;
use crate::dialect::Dialect;
use std::path::Path;

/// Read a file with the dialect's processor and default preferences
pub fn process_file(path: &Path, dialect: Dialect) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::for_dialect(dialect).process_file(path)
}

pub fn create_processor_from_preferences(
    prefs: &FileProcessorPreferences,
    dialect: Dialect,
) -> FileProcessor {
    FileProcessor::from_preferences(prefs, dialect)
}

/// Compile-time maximum file size
pub fn get_max_file_size() -> u64 {
    FileProcessor::max_file_size()
}

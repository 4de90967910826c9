use crate::file_processor::FileProcessorError;
use crate::grammar::GrammarError;
use crate::logging::{codes, Code};

/// Per-file pipeline errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("{0}")]
    Grammar(#[from] GrammarError),

    #[error(
        "The root folder '{root}' was not found in path '{path}' The path must follow the root folder"
    )]
    RootFolderNotFound { root: String, path: String },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::Grammar(e) => e.error_code(),
            Self::RootFolderNotFound { .. } => codes::file_processing::ROOT_FOLDER_NOT_FOUND,
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
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

    /// Recoverable failures (e.g. an empty file) are skipped by batch runs
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FileProcessing(e) => e.is_recoverable(),
            _ => codes::is_recoverable(self.error_code().as_str()),
        }
    }

    /// Case named by a grammar failure
    pub fn case_name(&self) -> Option<&str> {
        match self {
            Self::Grammar(e) => e.case_name(),
            _ => None,
        }
    }
}

use crate::assembler::ParsedCases;
use crate::file_processor::FileMetadata;
use std::time::Duration;

/// Cases assembled from one source file
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub cases: ParsedCases,
    pub file_metadata: FileMetadata,
    pub parent_folder_path: String,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        cases: ParsedCases,
        file_metadata: FileMetadata,
        parent_folder_path: String,
        processing_duration: Duration,
    ) -> Self {
        Self {
            cases,
            file_metadata,
            parent_folder_path,
            processing_duration,
        }
    }

    pub fn case_count(&self) -> usize {
        self.cases.case_count()
    }

    pub fn log_success(&self, file_path: &str) {
        crate::log_success!(
            crate::logging::codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Documentation extracted from file",
            "file" => file_path,
            "folder" => &self.parent_folder_path,
            "added" => self.cases.added.len(),
            "updated" => self.cases.updated.len(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}

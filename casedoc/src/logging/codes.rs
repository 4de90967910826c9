//! Error and success codes with their classification metadata
//!
//! Single source of truth for every code the crate logs. Error enums map
//! their variants onto these constants through `error_code()`, and the
//! registry below answers severity/category/halt questions for them.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Sync configuration error codes
pub mod configuration {
    use super::Code;

    pub const INVALID_SYNC_CONFIG: Code = Code::new("E001");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
    pub const ROOT_FOLDER_NOT_FOUND: Code = Code::new("E014");
}

/// Documentation grammar error codes
pub mod grammar {
    use super::Code;

    pub const MISSING_SECTION_HEADER: Code = Code::new("E040");
    pub const MALFORMED_SECTION_LINE: Code = Code::new("E041");
    pub const UNTERMINATED_TABLE: Code = Code::new("E042");
    pub const EMPTY_TABLE: Code = Code::new("E043");
    pub const TABLE_COLUMN_MISMATCH: Code = Code::new("E044");
    pub const STEP_NUMBERING: Code = Code::new("E045");
    pub const STEP_LABEL: Code = Code::new("E046");
    pub const MISSING_PROJECTS_LINE: Code = Code::new("E047");
    pub const UNKNOWN_PROJECT: Code = Code::new("E048");
    pub const EMPTY_PROJECT_SCOPE: Code = Code::new("E049");
    pub const DOCSTRING_START: Code = Code::new("E050");
    pub const MISSING_DOCUMENTATION_MARKER: Code = Code::new("E051");
    pub const MULTIPLE_SECTION_MARKERS: Code = Code::new("E052");
    pub const INVALID_TEST_CASE: Code = Code::new("E054");
}

/// Batch driver error codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E070");
    pub const NO_FILES_FOUND: Code = Code::new("E071");
    pub const TOO_MANY_FILES: Code = Code::new("E072");
    pub const TOO_MANY_CASES: Code = Code::new("E073");
    pub const THREAD_ERROR: Code = Code::new("E074");
    pub const TRAVERSAL_ERROR: Code = Code::new("E075");
}

/// Identifier injection and reconciliation error codes
pub mod identifiers {
    use super::Code;

    pub const REWRITE_FAILED: Code = Code::new("E080");
    pub const INVALID_EXECUTED_NAMES: Code = Code::new("E081");
    pub const REPORT_WRITE_FAILED: Code = Code::new("E082");
    pub const UNSUPPORTED_FRAMEWORK: Code = Code::new("E083");
}

/// Backend collaborator error codes
pub mod backend {
    use super::Code;

    pub const CONFLICT: Code = Code::new("E100");
    pub const UNAUTHORIZED: Code = Code::new("E101");
    pub const NOT_FOUND: Code = Code::new("E102");
    pub const RATE_LIMITED: Code = Code::new("E103");
    pub const CLIENT_ERROR: Code = Code::new("E104");
    pub const SERVER_ERROR: Code = Code::new("E105");
}

/// Warning codes (non-fatal conditions)
pub mod warnings {
    use super::Code;

    pub const GENERIC: Code = Code::new("W000");
    pub const ONLY_DEFAULT_PROJECT: Code = Code::new("W001");
    pub const UNMATCHED_RENAMES: Code = Code::new("W002");
    pub const FILE_LIMIT_REACHED: Code = Code::new("W003");
    pub const EVENT_LIMIT_REACHED: Code = Code::new("W004");
    pub const MANY_STEPS: Code = Code::new("W005");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    // File processing
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I007");

    // Assembly
    pub const CASE_ASSEMBLED: Code = Code::new("I040");
    pub const BLOCK_ASSEMBLED: Code = Code::new("I041");

    // Reconciliation
    pub const RECONCILIATION_COMPLETE: Code = Code::new("I060");
    pub const REPORT_WRITTEN: Code = Code::new("I061");

    // Identifier injection and result upload
    pub const IDENTIFIERS_INJECTED: Code = Code::new("I070");
    pub const RESULTS_PUSHED: Code = Code::new("I080");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

type Entry = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

// (code, category, severity, recoverable, requires_halt, description, action)
const REGISTRY_ENTRIES: &[Entry] = &[
    ("ERR001", "System", Severity::Critical, false, true,
        "Critical internal error",
        "File a bug report with the failing input"),
    ("ERR002", "System", Severity::Critical, false, true,
        "Logging or configuration initialization failure",
        "Check the build profile and runtime environment variables"),
    ("E001", "Configuration", Severity::High, false, true,
        "Sync configuration is missing or invalid",
        "Fix default_project and project_list in the sync configuration"),
    ("E005", "FileProcessing", Severity::Medium, false, true,
        "Source file not found",
        "Check the path and that the file exists"),
    ("E006", "FileProcessing", Severity::Low, true, false,
        "File extension does not match the dialect",
        "Use the dialect's file extension or disable the extension check"),
    ("E007", "FileProcessing", Severity::High, false, true,
        "File exceeds the compile-time size limit",
        "Split the file or raise max_file_size in the build profile"),
    ("E008", "FileProcessing", Severity::Low, true, false,
        "File is empty",
        "Add test cases to the file or exclude it"),
    ("E009", "FileProcessing", Severity::High, false, true,
        "Permission denied reading file",
        "Check file permissions"),
    ("E010", "FileProcessing", Severity::Medium, false, true,
        "File is not valid UTF-8",
        "Re-save the file as UTF-8"),
    ("E011", "FileProcessing", Severity::Medium, false, true,
        "I/O error while reading file",
        "Retry and check the file system"),
    ("E012", "FileProcessing", Severity::Medium, false, true,
        "Path is empty or not a file",
        "Pass a path to a regular file"),
    ("E013", "FileProcessing", Severity::High, false, true,
        "File exceeds the compile-time line limit",
        "Split the file or raise max_line_count in the build profile"),
    ("E014", "FileProcessing", Severity::Medium, false, true,
        "Configured root folder is not part of the file path",
        "Run from inside the configured root or fix root_path"),
    ("E040", "Grammar", Severity::Medium, false, true,
        "Expected section header is missing",
        "Check section order: Description, Prerequisites, Test Data, Steps"),
    ("E041", "Grammar", Severity::Medium, false, true,
        "Section line does not start with a number, dash or table marker",
        "Prefix the line with the next number, a dash, or *begin table*"),
    ("E042", "Grammar", Severity::Medium, false, true,
        "Table is missing its *end table* marker",
        "Close the table with *end table* before the blank line"),
    ("E043", "Grammar", Severity::Medium, false, true,
        "Table has no rows",
        "Add rows between *begin table* and *end table*"),
    ("E044", "Grammar", Severity::Medium, false, true,
        "Table row has a different column count than the first row",
        "Make every row use the same number of '|' separators"),
    ("E045", "Grammar", Severity::Medium, false, true,
        "Step numbering is out of sequence",
        "Number steps consecutively starting at 1)"),
    ("E046", "Grammar", Severity::Medium, false, true,
        "Step is missing its ER: or Notes: line",
        "Follow each numbered step with ER: and Notes: lines"),
    ("E047", "Grammar", Severity::Medium, false, true,
        "Projects line is missing after the steps",
        "Add a Projects: line directly after the last step"),
    ("E048", "Grammar", Severity::Medium, false, true,
        "Projects line names a project outside the allow-list",
        "Use a project from project_list in the sync configuration"),
    ("E049", "Grammar", Severity::Medium, false, true,
        "Projects line is empty or NA",
        "List at least one project"),
    ("E050", "Grammar", Severity::Medium, false, true,
        "Doc-string does not start right after the case header",
        "Open the doc-string on the line after the case header"),
    ("E051", "Grammar", Severity::Medium, false, true,
        "[Documentation] marker is missing after the case name",
        "Put [Documentation] on the line after the case name"),
    ("E052", "Grammar", Severity::Medium, false, true,
        "File has more than one test case section",
        "Remove duplicate or commented-out test case section headers"),
    ("E054", "Grammar", Severity::Medium, false, true,
        "Assembled test case violates model invariants",
        "Give the case a name, at least one step and an allowed project"),
    ("E070", "Batch", Severity::High, false, true,
        "Directory not found",
        "Check the directory path"),
    ("E071", "Batch", Severity::Low, true, false,
        "No files with the dialect extension were found",
        "Check the directory and dialect"),
    ("E072", "Batch", Severity::High, false, true,
        "Too many files discovered",
        "Narrow the directory or raise max_files_per_batch"),
    ("E073", "Batch", Severity::High, false, true,
        "Too many test cases selected for one run",
        "Limit the scope to fewer test cases"),
    ("E074", "Batch", Severity::Critical, false, true,
        "Worker thread failed",
        "Re-run sequentially and file a bug report"),
    ("E075", "Batch", Severity::Medium, false, true,
        "Directory traversal failed",
        "Check directory permissions"),
    ("E080", "Identifiers", Severity::High, false, true,
        "Failed to rewrite a file with assigned identifiers",
        "Check write permissions; the original file is unchanged"),
    ("E081", "Identifiers", Severity::Medium, false, true,
        "Executed test names do not carry a global identifier",
        "Rename executed tests with their global identifier prefix"),
    ("E082", "Identifiers", Severity::Medium, false, true,
        "Failed to write the reconciliation report",
        "Check the report destination"),
    ("E083", "Identifiers", Severity::Medium, false, true,
        "Execution results come from an unsupported framework",
        "Use pytest or robot result names"),
    ("E100", "Backend", Severity::Medium, true, false,
        "Backend reported a conflict",
        "The item already exists; refresh and retry"),
    ("E101", "Backend", Severity::High, false, true,
        "Backend rejected the credentials",
        "Check the backend credentials"),
    ("E102", "Backend", Severity::Medium, true, false,
        "Backend item not found",
        "Check the identifier and project"),
    ("E103", "Backend", Severity::Medium, true, false,
        "Backend rate limit reached",
        "Wait before retrying"),
    ("E104", "Backend", Severity::Medium, false, true,
        "Backend rejected the request",
        "Check the request payload"),
    ("E105", "Backend", Severity::High, true, false,
        "Backend server error",
        "Retry later"),
    ("W001", "Assembly", Severity::Low, true, false,
        "Only the default project was listed",
        "List the team projects the case belongs to"),
    ("W002", "Identifiers", Severity::Low, true, false,
        "Some renames were not applied",
        "Check that the listed cases still exist in their files"),
    ("W003", "Batch", Severity::Low, true, false,
        "File discovery stopped at the configured limit",
        "Raise max_files_per_batch or narrow the directory"),
    ("W004", "Logging", Severity::Low, true, false,
        "Per-file event limit reached",
        "Fix the earliest errors first"),
    ("W005", "Assembly", Severity::Low, true, false,
        "Test case has more steps than the configured limit",
        "Consider splitting the test case"),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires halting the current file
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

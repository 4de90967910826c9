//! Test-management backend seam
//!
//! The HTTP client lives outside this crate. [`CatalogBackend`] is the
//! surface the crate consumes; its errors are propagated unchanged and
//! never retried here.

use crate::log_success;
use crate::logging::{codes, Code};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: check the backend credentials")]
    Unauthorized,

    #[error("Not found: {item}")]
    NotFound { item: String },

    #[error("Rate limited by the backend")]
    RateLimited,

    #[error("Backend rejected the request with status {status}")]
    Client { status: u16 },

    #[error("Backend failed with status {status}")]
    Server { status: u16 },
}

impl BackendError {
    /// Map an HTTP status onto the taxonomy; `None` for success statuses
    pub fn from_status(status: u16, detail: &str) -> Option<Self> {
        match status {
            200..=399 => None,
            401 | 403 => Some(Self::Unauthorized),
            404 => Some(Self::NotFound {
                item: detail.to_string(),
            }),
            409 => Some(Self::Conflict {
                message: detail.to_string(),
            }),
            429 => Some(Self::RateLimited),
            400..=499 => Some(Self::Client { status }),
            _ => Some(Self::Server { status }),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Conflict { .. } => codes::backend::CONFLICT,
            Self::Unauthorized => codes::backend::UNAUTHORIZED,
            Self::NotFound { .. } => codes::backend::NOT_FOUND,
            Self::RateLimited => codes::backend::RATE_LIMITED,
            Self::Client { .. } => codes::backend::CLIENT_ERROR,
            Self::Server { .. } => codes::backend::SERVER_ERROR,
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
}

// ============================================================================
// EXECUTION RESULTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Passed,
    /// Assertion failure
    Failed,
    /// The test could not run to completion
    Errored,
}

impl ExecutionStatus {
    /// Status string the backend records; errors count as failures
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Passed => "PASSED",
            ExecutionStatus::Failed | ExecutionStatus::Errored => "FAILED",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed test and the message recorded with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    name: String,
    global_id: Option<String>,
    status: ExecutionStatus,
    duration_ms: u64,
    message: String,
}

impl ExecutionResult {
    pub fn passed(name: &str, duration_ms: u64, test_plan: &str, version: &str) -> Self {
        Self::new(name, duration_ms, ExecutionStatus::Passed, tested_for("Passed", test_plan, version))
    }

    pub fn failed(name: &str, duration_ms: u64, test_plan: &str, version: &str, reason: &str) -> Self {
        let message = format!(
            "{}\nTest case failed with the following reason: {}",
            tested_for("Failed", test_plan, version),
            reason
        );
        Self::new(name, duration_ms, ExecutionStatus::Failed, message)
    }

    pub fn errored(name: &str, duration_ms: u64, test_plan: &str, version: &str, reason: &str) -> Self {
        let message = format!(
            "{}\nTest case ran into an error with the following reason: {}",
            tested_for("Failed", test_plan, version),
            reason
        );
        Self::new(name, duration_ms, ExecutionStatus::Errored, message)
    }

    fn new(name: &str, duration_ms: u64, status: ExecutionStatus, message: String) -> Self {
        Self {
            name: name.to_string(),
            global_id: None,
            status,
            duration_ms,
            message,
        }
    }

    pub fn with_global_id(mut self, global_id: &str) -> Self {
        self.global_id = Some(global_id.to_string());
        self
    }

    /// Append a comment left for the whole run
    pub fn add_bulk_comment(&mut self, user: &str, comment: &str) {
        self.message.push_str(&format!(
            "\n\nTest case executer '{}' has left the following comment: {}",
            user, comment
        ));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn global_id(&self) -> Option<&str> {
        self.global_id.as_deref()
    }

    /// Key used to look the case up in the catalogue
    pub fn lookup_key(&self) -> &str {
        self.global_id.as_deref().unwrap_or(&self.name)
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn tested_for(outcome: &str, test_plan: &str, version: &str) -> String {
    format!(
        "{}. Tested for test plan '{}' on software version '{}'. ",
        outcome, test_plan, version
    )
}

// ============================================================================
// COLLABORATOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: u64,
    pub display_name: String,
}

/// Operations the crate needs from the test-management backend
pub trait CatalogBackend {
    /// Case id for `key` within `project`, `None` when absent
    fn lookup_identifier(&self, project: &str, key: &str) -> Result<Option<u64>, BackendError>;

    fn current_user_identity(&self) -> Result<UserIdentity, BackendError>;

    fn push_result(
        &self,
        case_id: u64,
        result: &ExecutionResult,
        user_id: u64,
    ) -> Result<(), BackendError>;
}

/// Push every result; the first backend error stops the run
pub fn push_results<B: CatalogBackend + ?Sized>(
    backend: &B,
    project: &str,
    results: &[ExecutionResult],
) -> Result<usize, BackendError> {
    push_results_with_comment(backend, project, results, None)
}

/// As [`push_results`], appending `bulk_comment` under the current user's name
pub fn push_results_with_comment<B: CatalogBackend + ?Sized>(
    backend: &B,
    project: &str,
    results: &[ExecutionResult],
    bulk_comment: Option<&str>,
) -> Result<usize, BackendError> {
    let user = backend.current_user_identity().inspect_err(log_backend_error)?;

    for result in results {
        let key = result.lookup_key();
        let case_id = backend
            .lookup_identifier(project, key)
            .and_then(|id| {
                id.ok_or_else(|| BackendError::NotFound {
                    item: format!("test case '{}' in project '{}'", key, project),
                })
            })
            .inspect_err(log_backend_error)?;

        match bulk_comment {
            Some(comment) => {
                let mut commented = result.clone();
                commented.add_bulk_comment(&user.display_name, comment);
                backend.push_result(case_id, &commented, user.id)
            }
            None => backend.push_result(case_id, result, user.id),
        }
        .inspect_err(log_backend_error)?;

        crate::log_debug!("Result pushed",
            "case" => key,
            "case_id" => case_id,
            "status" => result.status()
        );
    }

    log_success!(codes::success::RESULTS_PUSHED, "Execution results pushed",
        "project" => project,
        "results" => results.len(),
        "user" => &user.display_name
    );

    Ok(results.len())
}

fn log_backend_error(error: &BackendError) {
    crate::log_error!(error.error_code(), &error.to_string());
}

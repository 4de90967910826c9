//! Global ids from executed test names
//!
//! Execution reports carry the names the test runner saw. Names written
//! back by identifier injection embed the global id, which is recovered
//! here for reconciliation and result upload.

use crate::dialect::{annotated, keyword_table};
use crate::logging::{codes, Code};
use std::fmt;
use std::str::FromStr;

const PYTEST_PREFIX: &str = "test_gid_";
const ROBOT_PREFIX: &str = "TC-GID-";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error(
        "Error in test case names. Expecting '{expected_prefix}' in the following {framework} test case name: {}",
        .names.join(", ")
    )]
    InvalidExecutedNames {
        framework: ExecutedFramework,
        expected_prefix: &'static str,
        names: Vec<String>,
    },

    #[error(
        "Unsupported framework '{name}'. Please enter one of the valid test case types: pytest, robot"
    )]
    UnsupportedFramework { name: String },
}

impl ExtractError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidExecutedNames { .. } => codes::identifiers::INVALID_EXECUTED_NAMES,
            Self::UnsupportedFramework { .. } => codes::identifiers::UNSUPPORTED_FRAMEWORK,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// Runner that produced the executed names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutedFramework {
    Pytest,
    Robot,
}

impl ExecutedFramework {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutedFramework::Pytest => "pytest",
            ExecutedFramework::Robot => "robot",
        }
    }

    /// Prefix a name must carry to embed a global id
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ExecutedFramework::Pytest => PYTEST_PREFIX,
            ExecutedFramework::Robot => ROBOT_PREFIX,
        }
    }

    /// Global id embedded in `name`, if it carries one
    pub fn global_id(&self, name: &str) -> Option<String> {
        if !name.starts_with(self.id_prefix()) {
            return None;
        }
        let id = match self {
            ExecutedFramework::Pytest => annotated::derive_global_id(name),
            ExecutedFramework::Robot => keyword_table::derive_global_id(name),
        };
        Some(id)
    }
}

impl fmt::Display for ExecutedFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutedFramework {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pytest" => Ok(ExecutedFramework::Pytest),
            "robot" => Ok(ExecutedFramework::Robot),
            other => Err(ExtractError::UnsupportedFramework {
                name: other.to_string(),
            }),
        }
    }
}

/// Map executed names to global ids
///
/// In compare-only mode names without an embedded id pass through verbatim;
/// otherwise every such name is reported in one error.
pub fn global_ids_from_executed<S: AsRef<str>>(
    names: &[S],
    framework: ExecutedFramework,
    compare_only: bool,
) -> Result<Vec<String>, ExtractError> {
    let mut ids = Vec::with_capacity(names.len());
    let mut invalid = Vec::new();

    for name in names.iter().map(AsRef::as_ref) {
        match framework.global_id(name) {
            Some(id) => ids.push(id),
            None if compare_only => ids.push(name.to_string()),
            None => invalid.push(name.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(ids)
    } else {
        let error = ExtractError::InvalidExecutedNames {
            framework,
            expected_prefix: framework.id_prefix(),
            names: invalid,
        };
        crate::log_error!(error.error_code(), &error.to_string(),
            "framework" => framework
        );
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pytest_names() {
        let ids = global_ids_from_executed(
            &["test_gid_42_login", "test_gid_7"],
            ExecutedFramework::Pytest,
            false,
        )
        .unwrap();
        assert_eq!(ids, vec!["GID-42", "GID-7"]);
    }

    #[test]
    fn test_robot_names() {
        let ids = global_ids_from_executed(
            &["TC-GID-42: Login works", "TC-GID-3"],
            ExecutedFramework::Robot,
            false,
        )
        .unwrap();
        assert_eq!(ids, vec!["GID-42", "GID-3"]);
    }

    #[test]
    fn test_invalid_names_are_collected() {
        let err = global_ids_from_executed(
            &["test_gid_1_a", "test_login", "test_logout"],
            ExecutedFramework::Pytest,
            false,
        )
        .unwrap_err();

        assert_matches!(&err, ExtractError::InvalidExecutedNames { names, .. } if names.len() == 2);
        assert_eq!(
            err.to_string(),
            "Error in test case names. Expecting 'test_gid_' in the following pytest test case name: test_login, test_logout"
        );
        assert_eq!(err.error_code(), codes::identifiers::INVALID_EXECUTED_NAMES);
    }

    #[test]
    fn test_compare_only_passes_names_through() {
        let ids = global_ids_from_executed(
            &["Login works", "TC-GID-9: Logout"],
            ExecutedFramework::Robot,
            true,
        )
        .unwrap();
        assert_eq!(ids, vec!["Login works", "GID-9"]);
    }

    #[test]
    fn test_framework_parsing() {
        assert_eq!("robot".parse::<ExecutedFramework>(), Ok(ExecutedFramework::Robot));
        assert_matches!(
            "junit".parse::<ExecutedFramework>(),
            Err(ExtractError::UnsupportedFramework { .. })
        );
    }
}

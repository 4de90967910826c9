//! Pending renames from placeholder names to issued identifiers
//!
//! Keys are parent folder paths (see `file_processor::parent_folder_path`);
//! a source file matches the longest key contained in its path.

use crate::logging::codes;
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    #[error("Failed to read '{path}' for identifier injection: {message}")]
    Read { path: String, message: String },

    #[error("Failed to rewrite '{path}': {message}")]
    Write { path: String, message: String },
}

impl RenameError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::Read { .. } => codes::file_processing::IO_ERROR,
            Self::Write { .. } => codes::identifiers::REWRITE_FAILED,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

/// `parent folder path -> (old name -> new name)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, old_name: &str, new_name: &str) {
        self.entries
            .entry(path.to_string())
            .or_default()
            .insert(old_name.to_string(), new_name.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of renames still pending across all paths
    pub fn pending_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn pending_for(&self, path: &str) -> Option<&BTreeMap<String, String>> {
        self.entries.get(path)
    }

    /// Longest key contained in `file_path`
    pub fn matching_path(&self, file_path: &str) -> Option<&str> {
        self.entries
            .keys()
            .filter(|path| file_path.contains(path.as_str()))
            .max_by_key(|path| path.len())
            .map(String::as_str)
    }

    /// Take the rename for `old_name` under `path`; drops the path once empty
    pub(crate) fn consume(&mut self, path: &str, old_name: &str) -> Option<String> {
        let renames = self.entries.get_mut(path)?;
        let new_name = renames.remove(old_name)?;
        if renames.is_empty() {
            self.entries.remove(path);
        }
        Some(new_name)
    }

    /// Human-readable list of renames that never matched a line, if any
    pub fn unmatched_report(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let mut report =
            String::from("THE FOLLOWING TEST CASES WERE NOT FOUND OR UPDATED IN THE TEST FILE(S):\n");
        for (path, renames) in &self.entries {
            let _ = writeln!(report, "\n{}", path);
            for (old_name, new_name) in renames {
                let _ = writeln!(report, "    {}  : {}", old_name, new_name);
            }
        }
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_matching_path_wins() {
        let mut renames = RenameMap::new();
        renames.insert("tests/auth", "a", "b");
        renames.insert("tests/auth/test_login.py", "c", "d");

        assert_eq!(
            renames.matching_path("/ci/tests/auth/test_login.py"),
            Some("tests/auth/test_login.py")
        );
        assert_eq!(renames.matching_path("/ci/tests/auth/other.py"), Some("tests/auth"));
        assert_eq!(renames.matching_path("/ci/tests/cart.py"), None);
    }

    #[test]
    fn test_consume_drops_empty_paths() {
        let mut renames = RenameMap::new();
        renames.insert("tests/a.py", "test_NEW_x", "test_gid_1_x");
        renames.insert("tests/a.py", "test_NEW_y", "test_gid_2_y");
        assert_eq!(renames.pending_count(), 2);

        assert_eq!(renames.consume("tests/a.py", "test_NEW_x").as_deref(), Some("test_gid_1_x"));
        assert_eq!(renames.consume("tests/a.py", "test_NEW_x"), None);
        assert!(!renames.is_empty());

        renames.consume("tests/a.py", "test_NEW_y");
        assert!(renames.is_empty());
        assert_eq!(renames.unmatched_report(), None);
    }

    #[test]
    fn test_unmatched_report() {
        let mut renames = RenameMap::new();
        renames.insert("tests/login.robot", "<NEW>: Login", "TC-GID-9: Login");
        let report = renames.unmatched_report().unwrap();
        assert!(report.contains("\ntests/login.robot\n"));
        assert!(report.contains("    <NEW>: Login  : TC-GID-9: Login"));
    }
}

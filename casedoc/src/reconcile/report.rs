//! Plain-text reconciliation report

use crate::file_processor::write_atomic;
use crate::log_success;
use crate::logging::{codes, Code};
use crate::model::ReconciliationResult;
use std::path::Path;

const BANNER: &str = "==================== RECONCILIATION REPORT ====================";
const INDENT: &str = "     ";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write reconciliation report '{path}': {message}")]
    Write { path: String, message: String },
}

impl ReportError {
    pub fn error_code(&self) -> Code {
        codes::identifiers::REPORT_WRITE_FAILED
    }
}

/// `test case was` / `test cases were`, and the matching `has` / `have`
fn agreement(count: usize) -> (&'static str, &'static str, &'static str) {
    if count == 1 {
        ("test case", "was", "has")
    } else {
        ("test cases", "were", "have")
    }
}

fn push_block(out: &mut Vec<String>, entries: &[String], header: impl Fn(&str, &str) -> String) {
    if entries.is_empty() {
        return;
    }
    let (noun, be, have) = agreement(entries.len());
    let mut block = format!("The following {} {} {}", entries.len(), noun, header(be, have));
    for entry in entries {
        block.push('\n');
        block.push_str(INDENT);
        block.push_str(entry);
    }
    out.push(block);
}

/// Render the buckets in fixed order; empty buckets are omitted
pub fn render_report(result: &ReconciliationResult) -> String {
    let mut blocks = Vec::new();

    push_block(&mut blocks, &result.only_in_executed, |be, _| {
        format!("{} executed but not found in the catalogue:", be)
    });
    push_block(&mut blocks, &result.only_in_catalogued, |be, _| {
        format!("{} in the catalogue but not executed:", be)
    });
    push_block(&mut blocks, &result.near_match_executed, |be, have| {
        format!("{} executed and {} a near match in the catalogue:", be, have)
    });
    push_block(&mut blocks, &result.near_match_catalogued, |be, have| {
        format!("{} in the catalogue and {} a near match in the execution:", be, have)
    });

    if let Some(intersection) = &result.intersection {
        push_block(&mut blocks, intersection, |be, _| {
            format!("{} both executed and in the catalogue:", be)
        });
    }

    let mut report = format!("{}\n", BANNER);
    if !blocks.is_empty() {
        report.push_str(&blocks.join("\n\n"));
        report.push('\n');
    }
    report.push_str(&"=".repeat(BANNER.len()));
    report.push('\n');
    report
}

/// Write the rendered report, replacing `path` atomically
pub fn write_report(result: &ReconciliationResult, path: &Path) -> Result<(), ReportError> {
    let report = render_report(result);

    write_atomic(path, report.as_bytes()).map_err(|e| {
        let error = ReportError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        crate::log_error!(error.error_code(), &error.to_string());
        error
    })?;

    log_success!(codes::success::REPORT_WRITTEN, "Reconciliation report written",
        "path" => path.display(),
        "bytes" => report.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_report_layout() {
        let result = ReconciliationResult {
            only_in_executed: strings(&["GID-1"]),
            only_in_catalogued: strings(&["GID-2", "GID-3"]),
            near_match_executed: strings(&["a:1"]),
            near_match_catalogued: strings(&["a:9"]),
            intersection: Some(strings(&["GID-4", "GID-5"])),
        };

        let expected = "\
==================== RECONCILIATION REPORT ====================
The following 1 test case was executed but not found in the catalogue:
     GID-1

The following 2 test cases were in the catalogue but not executed:
     GID-2
     GID-3

The following 1 test case was executed and has a near match in the catalogue:
     a:1

The following 1 test case was in the catalogue and has a near match in the execution:
     a:9

The following 2 test cases were both executed and in the catalogue:
     GID-4
     GID-5
===============================================================
";
        assert_eq!(render_report(&result), expected);
    }

    #[test]
    fn test_empty_report() {
        let report = render_report(&ReconciliationResult::default());
        assert_eq!(
            report,
            format!("{}\n{}\n", BANNER, "=".repeat(BANNER.len()))
        );
    }

    #[test]
    fn test_empty_intersection_is_omitted() {
        let result = ReconciliationResult {
            only_in_executed: strings(&["x"]),
            intersection: Some(Vec::new()),
            ..Default::default()
        };
        let report = render_report(&result);
        assert!(!report.contains("both executed"));
        assert_eq!(report.lines().count(), 4);
    }

    #[test]
    fn test_write_report_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reconcile.log");
        std::fs::write(&path, "stale").unwrap();

        let result = ReconciliationResult {
            only_in_catalogued: strings(&["GID-8"]),
            ..Default::default()
        };
        write_report(&result, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_report(&result));
    }

    #[test]
    fn test_write_report_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.log");
        let err = write_report(&ReconciliationResult::default(), &path).unwrap_err();
        assert_eq!(err.error_code(), codes::identifiers::REPORT_WRITE_FAILED);
    }
}

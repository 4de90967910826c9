//! Per-file event collection with cargo-style output
//!
//! The batch layer sets a file context per worker thread; events logged while
//! that context is set are grouped under the file they came from.

use super::codes;
use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

/// File currently being processed on this thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
    pub average_file_time: Duration,
}

impl ProcessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.successful_files as f64 / self.total_files as f64
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe event collector keyed by file path
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a file; past the per-file limit a single W004 marker is kept
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = relock(&self.file_events);
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning_with_code(
                codes::warnings::EVENT_LIMIT_REACHED,
                &format!(
                    "Too many events for file (limit: {})",
                    MAX_LOG_EVENTS_PER_FILE
                ),
            ));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        relock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        relock(&self.file_events)
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.get_file_events(file_path)
            .into_iter()
            .filter(|e| e.is_error())
            .collect()
    }

    pub fn get_file_warnings(&self, file_path: &Path) -> Vec<LogEvent> {
        self.get_file_events(file_path)
            .into_iter()
            .filter(|e| e.is_warning())
            .collect()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        relock(&self.file_events).clone()
    }

    pub fn get_files_with_errors(&self) -> Vec<PathBuf> {
        relock(&self.file_events)
            .iter()
            .filter(|(_, events)| events.iter().any(|e| e.is_error()))
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = relock(&self.file_events);
        let contexts = relock(&self.file_contexts);

        let mut summary = ProcessingSummary::new();
        summary.total_files = events.len();
        summary.total_processing_time = self.processing_start.elapsed();

        let mut total_file_time = Duration::new(0, 0);
        let mut timed_files = 0u32;

        for (file_path, file_events) in events.iter() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if let Some(context) = contexts.get(file_path) {
                total_file_time += context.elapsed();
                timed_files += 1;
            }
        }

        if timed_files > 0 {
            summary.average_file_time = total_file_time / timed_files;
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        relock(&self.file_events).values().map(Vec::len).sum()
    }

    pub fn clear(&self) {
        relock(&self.file_events).clear();
        relock(&self.file_contexts).clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

/// One rendered event: a header line with the source location, then
/// `= key: value` notes. Errors also carry their classification and help.
fn render_event(output: &mut String, file_path: &Path, event: &LogEvent) {
    let kind = if event.is_error() { "error" } else { "warning" };
    let location = match (event.line, event.context.get("case")) {
        (Some(line), _) => format!(" --> {}:{}", file_path.display(), line),
        (None, Some(case)) => format!(" --> {} ({})", file_path.display(), case),
        (None, None) => String::new(),
    };

    output.push_str(&format!(
        "{}[{}]: {}{}\n",
        kind,
        event.code.as_str(),
        event.message,
        location
    ));

    if event.is_error() {
        output.push_str(&format!(
            "  = severity: {}, category: {}\n",
            event.severity(),
            event.category()
        ));
    }

    event
        .context
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "file" | "file_id"))
        .for_each(|(key, value)| output.push_str(&format!("  = {}: {}\n", key, value)));

    if event.is_error() {
        if let Some(metadata) = codes::get_error_metadata(event.code.as_str()) {
            output.push_str(&format!("  = help: {}\n", metadata.recommended_action));
        }
    }
}

/// Render collected events grouped by file, errors before warnings
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let mut reported: Vec<&LogEvent> = events
            .iter()
            .filter(|e| e.is_error() || e.is_warning())
            .collect();
        if reported.is_empty() {
            continue;
        }
        reported.sort_by_key(|e| !e.is_error());

        output.push_str(&format!("Checking {}...\n", file_path.display()));
        for event in reported {
            render_event(&mut output, file_path, event);
        }
        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() {
        output.push_str(&format!(
            "\n{} error(s) in {} file(s)\n",
            summary.total_errors, summary.failed_files
        ));
    }
    if summary.has_warnings() {
        output.push_str(&format!("{} warning(s)\n", summary.total_warnings));
    }

    output
}

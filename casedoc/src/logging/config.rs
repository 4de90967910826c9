//! Logging configuration: compile-time limits plus runtime preferences

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences once, before the first log call
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

fn with_runtime_preferences<R>(f: impl FnOnce(&LoggingPreferences) -> R) -> R {
    let preferences = RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default);
    f(preferences)
}

pub fn get_min_log_level() -> EventsLogLevel {
    with_runtime_preferences(|p| p.min_log_level.to_events_log_level())
}

pub fn use_structured_logging() -> bool {
    with_runtime_preferences(|p| p.use_structured_logging)
}

pub fn use_cargo_style_output() -> bool {
    with_runtime_preferences(|p| p.enable_cargo_style_output)
}

pub fn include_file_context() -> bool {
    with_runtime_preferences(|p| p.include_file_context)
}

/// Total events held by in-memory loggers (compile-time constant)
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Validate compile-time constants
pub fn validate_config() -> Result<(), String> {
    if LOG_BUFFER_SIZE < 100 {
        return Err(format!("Log buffer size too small: {}", LOG_BUFFER_SIZE));
    }

    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err("Max log events per file exceeds total buffer size".to_string());
    }

    Ok(())
}

/// Get configuration summary for diagnostics
pub fn get_config_summary() -> String {
    with_runtime_preferences(|preferences| {
        format!(
            "Logging Configuration ({}):\n\
             - Log buffer size: {}\n\
             - Max events per file: {}\n\
             - Max message length: {}\n\
             - Min log level: {}\n\
             - Structured logging: {}\n\
             - Cargo-style output: {}\n\
             - Include file context: {}",
            crate::config::build_info::source_info(),
            LOG_BUFFER_SIZE,
            MAX_LOG_EVENTS_PER_FILE,
            MAX_LOG_MESSAGE_LENGTH,
            preferences.min_log_level.as_str(),
            preferences.use_structured_logging,
            preferences.enable_cargo_style_output,
            preferences.include_file_context,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_time_limits_validate() {
        assert!(validate_config().is_ok());
        assert!(get_max_log_events_per_file() <= get_error_buffer_size());
    }

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("Log buffer size"));
        assert!(summary.contains("Min log level"));
    }
}

// RUNTIME PREFERENCES (User Experience)
//
// Resource limits live in the generated compile_time constants and cannot
// be changed here. These structs only toggle behavior within those limits.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Reject files whose extension does not match the dialect
    pub require_dialect_extension: bool,

    /// Whether to log size/line/duration metrics on success
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_dialect_extension: env_or(env_vars::REQUIRE_DIALECT_EXTENSION, true),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPreferences {
    /// Walk sub-directories during discovery
    pub recursive: bool,

    /// Process files on worker threads
    pub parallel: bool,

    /// Stop at the first failing file
    pub fail_fast: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            recursive: env_or(env_vars::BATCH_RECURSIVE, true),
            parallel: env_or(env_vars::BATCH_PARALLEL, false),
            fail_fast: env_or(env_vars::BATCH_FAIL_FAST, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Minimum level written by the console loggers
    pub min_log_level: LogLevel,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to attach the current file to log events
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub batch: BatchPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // File processor
    pub const REQUIRE_DIALECT_EXTENSION: &str = "CASEDOC_REQUIRE_DIALECT_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "CASEDOC_ENABLE_PERFORMANCE_LOGGING";

    // Batch
    pub const BATCH_RECURSIVE: &str = "CASEDOC_BATCH_RECURSIVE";
    pub const BATCH_PARALLEL: &str = "CASEDOC_BATCH_PARALLEL";
    pub const BATCH_FAIL_FAST: &str = "CASEDOC_BATCH_FAIL_FAST";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CASEDOC_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "CASEDOC_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "CASEDOC_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "CASEDOC_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_env_or_falls_back_on_unparsable_values() {
        assert!(env_or("CASEDOC_TEST_UNSET_VARIABLE_FOR_DEFAULTS", true));
        assert_eq!(env_or("CASEDOC_TEST_UNSET_VARIABLE_FOR_DEFAULTS", 7usize), 7);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert_eq!(LogLevel::Warning.as_str(), "WARN");
    }
}

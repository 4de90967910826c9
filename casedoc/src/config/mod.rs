//! Configuration module for casedoc
//!
//! Three layers: compile-time resource limits generated from TOML by
//! build.rs, runtime preferences read from the environment, and the
//! sync configuration (project allow-list, default project, root folder)
//! that callers load and thread explicitly into the assembler.

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;
pub mod sync;

pub use runtime::{BatchPreferences, FileProcessorPreferences, LogLevel, LoggingPreferences};
pub use sync::{ConfigError, SyncConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("CASEDOC_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("CASEDOC_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::assembly::MAX_CASES_PER_RUN >= 1);
        assert!(compile_time::assembly::MAX_STEPS_PER_CASE >= 1);
        assert!(
            compile_time::file_processing::LARGE_FILE_THRESHOLD
                <= compile_time::file_processing::MAX_FILE_SIZE
        );
        assert!(
            compile_time::logging::MAX_LOG_EVENTS_PER_FILE
                <= compile_time::logging::LOG_BUFFER_SIZE
        );
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}

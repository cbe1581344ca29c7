//! Configuration for the bracket parser
//!
//! Hard limits are generated at build time from `config/<profile>.toml`;
//! user-facing preferences live in [`runtime`] and may come from the
//! environment or a TOML file.

// Generated by build.rs from the selected TOML profile
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("BRACKET_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("BRACKET_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        use compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
        use compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE};

        assert!(LARGE_FILE_THRESHOLD <= MAX_FILE_SIZE);
        assert!(MAX_LOG_EVENTS_PER_FILE <= LOG_BUFFER_SIZE);
        assert!(compile_time::batch_processing::MAX_FILES_PER_BATCH > 0);
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = build_info::source_info();
        assert!(info.contains(build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}

//! Logging configuration
//!
//! Buffer limits are compile-time constants; everything else is a runtime
//! preference installed once at startup.

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();
static DEFAULT_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences. Fails if called twice.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    validate_preferences(&preferences)?;

    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Installed preferences, or environment defaults
pub fn preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES
        .get()
        .unwrap_or_else(|| DEFAULT_PREFERENCES.get_or_init(LoggingPreferences::default))
}

pub fn log_performance_events() -> bool {
    preferences().log_performance_events
}

pub fn include_file_context() -> bool {
    preferences().include_file_context
}

fn validate_preferences(preferences: &LoggingPreferences) -> Result<(), String> {
    match &preferences.log_file {
        Some(path) if path.trim().is_empty() => Err("Log file path must not be blank".to_string()),
        _ => Ok(()),
    }
}

/// Check the build limits against each other and the installed preferences
pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "Log buffer size {} outside 100..=100000",
            LOG_BUFFER_SIZE
        ));
    }

    if MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err("Max log events per file exceeds total buffer size".to_string());
    }

    validate_preferences(preferences())
}

pub fn get_config_summary() -> String {
    let preferences = preferences();

    format!(
        "Logging ({} limits): buffer {}, {} events per file, messages up to {} bytes\n\
         Level {}, console {}, structured {}, log file {}, cargo-style {}",
        crate::config::build_info::profile(),
        LOG_BUFFER_SIZE,
        MAX_LOG_EVENTS_PER_FILE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level.as_str(),
        preferences.enable_console_logging,
        preferences.use_structured_logging,
        preferences.log_file.as_deref().unwrap_or("none"),
        preferences.enable_cargo_style_output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_time_limits_validate() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_blank_log_file_rejected() {
        let preferences = LoggingPreferences {
            log_file: Some("   ".to_string()),
            ..LoggingPreferences::default()
        };
        assert!(validate_preferences(&preferences).is_err());
        assert!(init_runtime_preferences(preferences).is_err());
    }

    #[test]
    fn test_summary_mentions_limits() {
        let summary = get_config_summary();
        assert!(summary.contains(&format!("buffer {}", LOG_BUFFER_SIZE)));
        assert!(summary.contains("Level "));
    }
}

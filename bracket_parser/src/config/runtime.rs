// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

pub use crate::logging::LogLevel;

/// Read a typed value from the environment, falling back on absence or parse failure
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Only accept files with this extension (no leading dot)
    pub required_extension: Option<String>,

    /// Whether to log size/line metrics for every processed file
    pub log_file_metrics: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            required_extension: env::var(env_vars::REQUIRE_EXTENSION)
                .ok()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .filter(|ext| !ext.is_empty()),
            log_file_metrics: env_or(env_vars::LOG_FILE_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to count every terminal kind separately
    pub collect_terminal_histogram: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_terminal_histogram: env_or(env_vars::LEXICAL_HISTOGRAM, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Record every derivation step for later inspection
    pub record_trace: bool,

    /// Emit a debug event per derivation step (very noisy)
    pub log_derivation_steps: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            record_trace: env_or(env_vars::PARSER_TRACE, false),
            log_derivation_steps: env_or(env_vars::PARSER_LOG_STEPS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to print log events to stderr
    pub enable_console_logging: bool,

    /// Minimum level that reaches the log sinks
    pub min_log_level: LogLevel,

    /// Whether to include performance metrics in logs
    pub log_performance_events: bool,

    /// Whether to print a cargo-style error summary after a batch
    pub enable_cargo_style_output: bool,

    /// Whether to attach the current file to each event
    pub include_file_context: bool,

    /// Optional file that receives every log event
    pub log_file: Option<String>,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_or(env_vars::LOGGING_LOG_PERFORMANCE, false),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, false),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
            log_file: env::var(env_vars::LOGGING_FILE).ok().filter(|p| !p.is_empty()),
        }
    }
}

/// Parse log level from string (used for environment variables and config files)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a runtime configuration file
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid config file '{path}': {message}")]
    Parse { path: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Preferences taken from the environment only
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Load preferences from a TOML file; absent keys keep their environment defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_EXTENSION: &str = "BRACKET_REQUIRE_EXTENSION";
    pub const LOG_FILE_METRICS: &str = "BRACKET_LOG_FILE_METRICS";

    // Lexical
    pub const LEXICAL_HISTOGRAM: &str = "BRACKET_LEXICAL_HISTOGRAM";

    // Parser
    pub const PARSER_TRACE: &str = "BRACKET_PARSER_TRACE";
    pub const PARSER_LOG_STEPS: &str = "BRACKET_PARSER_LOG_STEPS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "BRACKET_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "BRACKET_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "BRACKET_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "BRACKET_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "BRACKET_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "BRACKET_LOGGING_INCLUDE_FILE_CONTEXT";
    pub const LOGGING_FILE: &str = "BRACKET_LOGGING_FILE";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level(" info "), Some(LogLevel::Info));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [parser]
            record_trace = true

            [logging]
            min_log_level = "Debug"
            "#,
        )
        .unwrap();

        assert!(config.parser.record_trace);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(
            config.lexical.collect_terminal_histogram,
            LexicalPreferences::default().collect_terminal_histogram
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[file_processor]\nrequired_extension = \"txt\"").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(
            config.file_processor.required_extension.as_deref(),
            Some("txt")
        );
    }

    #[test]
    fn test_load_errors() {
        assert_matches!(
            RuntimeConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        );

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[parser]\nrecord_trace = \"maybe\"").unwrap();
        assert_matches!(
            RuntimeConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        );
    }

    #[test]
    fn test_env_var_names_share_prefix() {
        for name in [
            env_vars::REQUIRE_EXTENSION,
            env_vars::PARSER_TRACE,
            env_vars::LOGGING_MIN_LEVEL,
            env_vars::LOGGING_FILE,
        ] {
            assert!(name.starts_with("BRACKET_"));
        }
    }
}

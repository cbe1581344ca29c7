//! Log sinks
//!
//! Sinks write to stderr or a file. Stdout carries only the per-file reports,
//! so the two streams never interleave.

use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

fn render(event: &LogEvent, structured: bool) -> String {
    if structured {
        event.format_json().unwrap_or_else(|_| event.format())
    } else {
        event.format()
    }
}

/// One event per line on stderr, as text or JSON
pub struct StderrLogger {
    structured: bool,
}

impl StderrLogger {
    pub fn new(structured: bool) -> Self {
        Self { structured }
    }
}

impl Logger for StderrLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", render(event, self.structured));
    }
}

/// Appends one event per line to a file
pub struct FileLogger {
    file_path: PathBuf,
    structured: bool,
}

impl FileLogger {
    /// Creates missing parent directories and checks the file opens for append
    pub fn new<P: AsRef<Path>>(file_path: P, structured: bool) -> io::Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&file_path)?;

        Ok(Self {
            file_path,
            structured,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        // Write failures are dropped; reporting them would recurse into logging
        if let Ok(mut file) = OpenOptions::new().append(true).open(&self.file_path) {
            let _ = writeln!(file, "{}", render(event, self.structured));
        }
    }
}

/// Level filter in front of the configured sinks
pub struct LoggingService {
    sinks: Vec<Box<dyn Logger>>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            sinks: Vec::new(),
            min_level,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn Logger>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Sinks chosen by preferences. With console output off and no log file
    /// there are none, and events only reach the error collector.
    pub fn from_preferences(preferences: &LoggingPreferences) -> io::Result<Self> {
        let structured = preferences.use_structured_logging;
        let mut service = Self::new(preferences.min_log_level);

        if preferences.enable_console_logging {
            service = service.with_sink(Box::new(StderrLogger::new(structured)));
        }
        if let Some(path) = &preferences.log_file {
            service = service.with_sink(Box::new(FileLogger::new(path, structured)?));
        }

        Ok(service)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: &LogEvent) {
        if self.should_log(event.level) {
            for sink in &self.sinks {
                sink.log(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<LogEvent>>>);

    impl Logger for Recorder {
        fn log(&self, event: &LogEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_service_filters_by_level() {
        let recorder = Recorder::default();
        let service = LoggingService::new(LogLevel::Warning).with_sink(Box::new(recorder.clone()));

        service.log_event(&LogEvent::debug("steps"));
        service.log_event(&LogEvent::success(codes::success::INPUT_ACCEPTED, "accepted"));
        service.log_event(&LogEvent::warning("no files"));
        service.log_event(&LogEvent::error(codes::syntax::UNMATCHED_BRACKET, "unmatched ("));

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_warning());
        assert_eq!(events[1].code, codes::syntax::UNMATCHED_BRACKET);
    }

    #[test]
    fn test_every_sink_receives_the_event() {
        let first = Recorder::default();
        let second = Recorder::default();
        let service = LoggingService::new(LogLevel::Debug)
            .with_sink(Box::new(first.clone()))
            .with_sink(Box::new(second.clone()));

        service.log_event(&LogEvent::info("classified"));

        assert_eq!(service.sink_count(), 2);
        assert_eq!(first.0.lock().unwrap().len(), 1);
        assert_eq!(second.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_quiet_preferences_have_no_sinks() {
        let preferences = LoggingPreferences {
            enable_console_logging: false,
            log_file: None,
            ..LoggingPreferences::default()
        };
        let service = LoggingService::from_preferences(&preferences).unwrap();
        assert_eq!(service.sink_count(), 0);

        let noisy = LoggingPreferences {
            enable_console_logging: true,
            min_log_level: LogLevel::Debug,
            ..preferences
        };
        let service = LoggingService::from_preferences(&noisy).unwrap();
        assert_eq!(service.sink_count(), 1);
        assert_eq!(service.min_level(), LogLevel::Debug);
    }

    #[test]
    fn test_file_logger_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("parser.log");
        let service = LoggingService::new(LogLevel::Info)
            .with_sink(Box::new(FileLogger::new(&path, false).unwrap()));

        service.log_event(&LogEvent::info("first"));
        service.log_event(&LogEvent::debug("filtered out"));
        service.log_event(&LogEvent::error(codes::syntax::NO_OPEN_SCOPE, "second"));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("E041"));
    }

    #[test]
    fn test_structured_file_logger_writes_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parser.jsonl");
        let logger = FileLogger::new(&path, true).unwrap();

        logger.log(&LogEvent::success(codes::success::INPUT_ACCEPTED, "ok"));

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["code"], "I040");
    }
}

//! Per-file error collection and the cargo-style summary

use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// The input file whose events are being logged on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

/// Error and warning events keyed by the file that produced them
#[derive(Default)]
pub struct ErrorCollector {
    files: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Keeps at most `MAX_LOG_EVENTS_PER_FILE` events per file, then one overflow notice
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut files = self.files();
        let events = files.entry(file_path.to_path_buf()).or_default();

        if events.len() < MAX_LOG_EVENTS_PER_FILE {
            events.push(event);
        } else if events.len() == MAX_LOG_EVENTS_PER_FILE {
            events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.files().get(file_path).cloned().unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.files()
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    /// (errors, warnings) over every file
    pub fn totals(&self) -> (usize, usize) {
        self.files()
            .values()
            .flatten()
            .fold((0, 0), |(errors, warnings), event| {
                (
                    errors + usize::from(event.is_error()),
                    warnings + usize::from(event.is_warning()),
                )
            })
    }

    /// `error[CODE]: message --> file:line:col` blocks grouped by file
    pub fn format_cargo_style(&self) -> String {
        let mut output = String::new();

        for (file_path, events) in self.files().iter() {
            if events.is_empty() {
                continue;
            }
            output.push_str(&format!("Checking {}...\n", file_path.display()));
            for event in events {
                output.push_str(&cargo_style_entry(file_path, event));
            }
            output.push('\n');
        }

        let (errors, warnings) = self.totals();
        if errors > 0 {
            output.push_str(&format!("Total errors: {}\n", errors));
        }
        if warnings > 0 {
            output.push_str(&format!("Total warnings: {}\n", warnings));
        }

        output
    }
}

fn cargo_style_entry(file_path: &Path, event: &LogEvent) -> String {
    let label = if event.is_error() { "error" } else { "warning" };
    let location = event
        .span
        .map(|s| format!(" --> {}:{}", file_path.display(), s.start()))
        .unwrap_or_default();

    let mut entry = format!("{}[{}]: {}{}\n", label, event.code, event.message, location);

    for (key, value) in event.context.iter().filter(|(k, _)| *k != "file") {
        entry.push_str(&format!("  = {}: {}\n", key, value));
    }

    if event.is_error() {
        if let Some(metadata) = super::codes::get_error_metadata(event.code.as_str()) {
            entry.push_str(&format!("  = help: {}\n", metadata.recommended_action));
        }
    }

    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_events_are_kept_per_file() {
        let collector = ErrorCollector::new();
        let broken = PathBuf::from("broken.txt");
        let noisy = PathBuf::from("noisy.txt");

        collector.record_event(
            &broken,
            LogEvent::error(codes::syntax::UNMATCHED_BRACKET, "unmatched ("),
        );
        collector.record_event(&noisy, LogEvent::warning("slow"));

        assert_eq!(collector.get_file_errors(&broken).len(), 1);
        assert_eq!(collector.get_file_events(&noisy).len(), 1);
        assert!(collector.get_file_errors(&noisy).is_empty());
        assert_eq!(collector.totals(), (1, 1));
    }

    #[test]
    fn test_per_file_cap() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("flood.txt");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(&file_path, LogEvent::warning("again"));
        }

        let events = collector.get_file_events(&file_path);
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert!(events.last().unwrap().message.contains("Too many events"));
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("nested.txt");
        let span = Span::of_char(Position::new(6, 2, 4), ')');

        collector.record_event(
            &file_path,
            LogEvent::error(codes::syntax::UNMATCHED_BRACKET, "can't find matching bracket for [")
                .with_span(span)
                .with_context("scope_level", "2")
                .with_context("file", "nested.txt"),
        );

        let output = collector.format_cargo_style();
        assert!(output.contains("Checking nested.txt..."));
        assert!(output.contains(
            "error[E040]: can't find matching bracket for [ --> nested.txt:2:4"
        ));
        assert!(output.contains("  = scope_level: 2"));
        assert!(!output.contains("  = file:"));
        assert!(output.contains("  = help: Close the reported bracket"));
        assert!(output.contains("Total errors: 1"));
        assert!(!output.contains("Total warnings"));
    }
}

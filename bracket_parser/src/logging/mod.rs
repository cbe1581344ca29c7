//! Global logging for the bracket parser
//!
//! A process-wide [`LoggingService`] plus an [`ErrorCollector`] that groups
//! errors by input file. Stages log through the macros in [`macros`]; the
//! current file is tracked per thread so events are attributed without the
//! parser having to know which file it is reading.
//!
//! Before [`init_global_logging`] runs every macro is a no-op, so the library
//! works without any setup.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::utils::Span;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext};
pub use events::{LogEvent, LogLevel};
pub use service::{Logger, LoggingService};

static GLOBAL_LOGGER: OnceLock<LoggingService> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<ErrorCollector> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

/// Initialize global logging from the installed preferences.
///
/// Calling this again after a successful initialization is a no-op.
pub fn init_global_logging() -> Result<(), String> {
    if is_initialized() {
        return Ok(());
    }

    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::syntax::UNMATCHED_BRACKET,
        codes::syntax::NO_OPEN_SCOPE,
        codes::success::INPUT_ACCEPTED,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    let service = LoggingService::from_preferences(config::preferences())
        .map_err(|e| format!("Cannot open log sink: {}", e))?;

    GLOBAL_ERROR_COLLECTOR.get_or_init(ErrorCollector::new);

    // Another thread may have won the race; its service stays installed
    if GLOBAL_LOGGER.set(service).is_ok() {
        crate::log_success!(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized"
        );
    }

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get()
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR.get()
}

/// Whether an event at `level` passes the service's level filter
pub fn is_level_enabled(level: LogLevel) -> bool {
    try_get_global_logger().map_or(false, |logger| logger.should_log(level))
}

/// Run `f` with `file_path` as the current file, restoring the previous context afterwards
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let context = FileProcessingContext { file_path, file_id };
    let previous = FILE_CONTEXT.with(|ctx| ctx.replace(Some(context)));
    let result = f();
    FILE_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

pub fn current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn decorate(mut event: LogEvent, span: Option<Span>, context: Vec<(&str, &str)>) -> LogEvent {
    if let Some(span) = span {
        event = event.with_span(span);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if config::include_file_context() {
        if let Some(file_ctx) = current_file_context() {
            event = event.with_context("file", &file_ctx.file_path.display().to_string());
        }
    }

    event
}

/// Errors and warnings also go to the collector under the current file
fn dispatch(event: LogEvent) {
    if event.is_error() || event.is_warning() {
        if let (Some(file_ctx), Some(collector)) =
            (current_file_context(), try_get_global_error_collector())
        {
            collector.record_event(&file_ctx.file_path, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(&event);
    }
}

#[doc(hidden)]
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<Span>,
    context: Vec<(&str, &str)>,
) {
    if !is_initialized() {
        return;
    }
    dispatch(decorate(LogEvent::error(code, message), span, context));
}

#[doc(hidden)]
pub fn log_warning_with_context(code: Option<Code>, message: &str, context: Vec<(&str, &str)>) {
    if !is_initialized() {
        return;
    }
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch(decorate(event, None, context));
}

#[doc(hidden)]
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if is_level_enabled(LogLevel::Info) {
        dispatch(decorate(LogEvent::success(code, message), None, context));
    }
}

#[doc(hidden)]
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    if is_level_enabled(LogLevel::Info) {
        dispatch(decorate(LogEvent::info(message), None, context));
    }
}

#[doc(hidden)]
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    if is_level_enabled(LogLevel::Debug) {
        dispatch(decorate(LogEvent::debug(message), None, context));
    }
}

/// Errors recorded for `file_path` since startup
pub fn get_file_errors(file_path: &Path) -> Vec<LogEvent> {
    try_get_global_error_collector()
        .map(|collector| collector.get_file_errors(file_path))
        .unwrap_or_default()
}

/// Print the cargo-style error summary to stderr
pub fn print_cargo_style_summary() {
    if let Some(collector) = try_get_global_error_collector() {
        eprint!("{}", collector.format_cargo_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_logging_initialization_is_idempotent() {
        assert!(init_global_logging().is_ok());
        assert!(is_initialized());
        assert!(init_global_logging().is_ok());
    }

    #[test]
    fn test_with_file_context_restores_previous() {
        let outer = PathBuf::from("outer.txt");
        let inner = PathBuf::from("inner.txt");

        assert!(current_file_context().is_none());

        with_file_context(outer.clone(), 0, || {
            let result = with_file_context(inner.clone(), 1, || {
                let context = current_file_context().unwrap();
                assert_eq!(context.file_path, inner);
                assert_eq!(context.file_id, 1);
                42
            });
            assert_eq!(result, 42);
            assert_eq!(current_file_context().unwrap().file_path, outer);
        });

        assert!(current_file_context().is_none());
    }

    #[test]
    fn test_errors_are_collected_per_file() {
        init_global_logging().unwrap();
        let file_path = PathBuf::from("collected-errors-test.txt");

        with_file_context(file_path.clone(), 7, || {
            log_error_with_context(
                codes::syntax::NO_OPEN_SCOPE,
                "stray )",
                None,
                vec![("found", ")")],
            );
        });

        let errors = get_file_errors(&file_path);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::syntax::NO_OPEN_SCOPE);
        assert_eq!(errors[0].context.get("found").map(String::as_str), Some(")"));
        assert!(get_file_errors(Path::new("never-logged.txt")).is_empty());
    }
}

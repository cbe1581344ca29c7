//! Syntax analysis: terminal stream to acceptance or a located error

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::{Acceptance, DerivationTrace, LlParser, ParseMetrics, TraceStep};

use crate::config::runtime::ParserPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

/// Parse with the built-in table and default preferences
pub fn parse_tokens(tokens: &TokenStream) -> SyntaxResult<Acceptance> {
    parse_tokens_with_preferences(tokens, ParserPreferences::default())
}

pub fn parse_tokens_with_preferences(
    tokens: &TokenStream,
    preferences: ParserPreferences,
) -> SyntaxResult<Acceptance> {
    let mut parser = LlParser::with_preferences(preferences);
    let result = parser.parse(tokens);
    log_outcome(tokens, &result);
    result
}

/// Emit the success or error event for a finished parse
pub fn log_outcome(tokens: &TokenStream, result: &SyntaxResult<Acceptance>) {
    match result {
        Ok(accepted) => {
            log_success!(
                codes::success::INPUT_ACCEPTED,
                "Input accepted",
                "tokens" => tokens.len(),
                "brackets" => accepted.bracket_count,
                "expansions" => accepted.metrics.expansions
            );
        }
        Err(error) => match error.span() {
            Some(span) => {
                log_error!(error.error_code(), &error.to_string(), span = span,
                    "internal" => error.is_internal()
                );
            }
            None => {
                log_error!(error.error_code(), &error.to_string(),
                    "internal" => error.is_internal()
                );
            }
        },
    }
}

/// Check the codes this stage logs with are registered
pub fn init_syntax_logging() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNMATCHED_BRACKET,
        codes::syntax::NO_OPEN_SCOPE,
        codes::syntax::MISSING_END_OF_STREAM,
        codes::syntax::NO_PARSE_RULE,
        codes::syntax::STACK_EXHAUSTED,
        codes::syntax::NO_CONSUMED_TOKEN,
        codes::semantic::SCOPE_UNDERFLOW,
        codes::semantic::SCOPE_MISMATCH,
        codes::success::INPUT_ACCEPTED,
    ];

    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("Syntax module logging validation completed",
        "trace_limit" => crate::config::compile_time::syntax::MAX_TRACE_STEPS
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::classify_source;
    use crate::logging;
    use std::path::PathBuf;

    #[test]
    fn test_init_syntax_logging() {
        assert!(init_syntax_logging().is_ok());
    }

    #[test]
    fn test_failure_is_collected_for_current_file() {
        logging::init_global_logging().unwrap();
        let path = PathBuf::from("syntax-outcome-test.txt");

        let result = logging::with_file_context(path.clone(), 0, || {
            parse_tokens(&classify_source("{]"))
        });

        assert!(result.is_err());
        let errors = logging::get_file_errors(&path);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::syntax::UNMATCHED_BRACKET);
        assert!(errors[0].span.is_some());
    }
}

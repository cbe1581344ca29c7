//! Parse failures
//!
//! The two user-facing variants render as the report line printed for a
//! rejected input. Everything else is an engine defect and should be
//! unreachable with the built-in table.

use crate::grammar::{Nonterminal, SemanticRoutine};
use crate::logging::codes;
use crate::logging::Code;
use crate::semantics::SemanticError;
use crate::tokens::Terminal;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// Mismatch while at least one bracket is open; reported against the innermost one
    #[error("Syntax error: can't find matching bracket for {bracket} on line {line} (scope level: {depth})")]
    UnmatchedBracket {
        bracket: Terminal,
        line: u32,
        depth: usize,
        expected: Terminal,
        found: Terminal,
        span: Span,
    },

    /// Mismatch with nothing open, such as a stray closer
    #[error("Syntax error: unexpected {} on line {line} with no open scope", .found.describe())]
    NoOpenScope {
        expected: Terminal,
        found: Terminal,
        line: u32,
        span: Span,
    },

    #[error("Internal parser error: no rule for {nonterminal} on lookahead {lookahead} at token {position}")]
    NoRule {
        nonterminal: Nonterminal,
        lookahead: Terminal,
        position: usize,
    },

    #[error("Internal parser error: token stream does not end with an end-of-stream marker")]
    MissingEndOfStream,

    #[error("Internal parser error: parse stack emptied at token {position} before end of input")]
    StackExhausted { position: usize },

    #[error("Internal parser error: {routine} ran before any token was consumed")]
    NoConsumedToken { routine: SemanticRoutine },

    #[error("Internal parser error: {0}")]
    Semantic(#[from] SemanticError),
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnmatchedBracket { .. } => codes::syntax::UNMATCHED_BRACKET,
            Self::NoOpenScope { .. } => codes::syntax::NO_OPEN_SCOPE,
            Self::NoRule { .. } => codes::syntax::NO_PARSE_RULE,
            Self::MissingEndOfStream => codes::syntax::MISSING_END_OF_STREAM,
            Self::StackExhausted { .. } => codes::syntax::STACK_EXHAUSTED,
            Self::NoConsumedToken { .. } => codes::syntax::NO_CONSUMED_TOKEN,
            Self::Semantic(inner) => inner.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnmatchedBracket { span, .. } | Self::NoOpenScope { span, .. } => Some(*span),
            Self::Semantic(inner) => Some(inner.span()),
            Self::NoRule { .. }
            | Self::MissingEndOfStream
            | Self::StackExhausted { .. }
            | Self::NoConsumedToken { .. } => None,
        }
    }

    /// Engine defects as opposed to rejected input
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::UnmatchedBracket { .. } | Self::NoOpenScope { .. })
    }

    /// Terminal the engine wanted when a match failed
    pub fn expected(&self) -> Option<Terminal> {
        match self {
            Self::UnmatchedBracket { expected, .. } | Self::NoOpenScope { expected, .. } => {
                Some(*expected)
            }
            _ => None,
        }
    }

    pub fn found(&self) -> Option<Terminal> {
        match self {
            Self::UnmatchedBracket { found, .. } | Self::NoOpenScope { found, .. } => Some(*found),
            Self::NoRule { lookahead, .. } => Some(*lookahead),
            _ => None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_bracket_message() {
        let err = SyntaxError::UnmatchedBracket {
            bracket: Terminal::LeftBracket,
            line: 2,
            depth: 2,
            expected: Terminal::RightBracket,
            found: Terminal::RightParen,
            span: Span::dummy(),
        };
        assert_eq!(
            err.to_string(),
            "Syntax error: can't find matching bracket for [ on line 2 (scope level: 2)"
        );
        assert!(!err.is_internal());
        assert_eq!(err.error_code(), codes::syntax::UNMATCHED_BRACKET);
        assert_eq!(err.expected(), Some(Terminal::RightBracket));
    }

    #[test]
    fn test_no_open_scope_message() {
        let err = SyntaxError::NoOpenScope {
            expected: Terminal::EndOfStream,
            found: Terminal::RightParen,
            line: 3,
            span: Span::dummy(),
        };
        assert_eq!(
            err.to_string(),
            "Syntax error: unexpected ')' on line 3 with no open scope"
        );
        assert_eq!(err.error_code().as_str(), "E041");
    }

    #[test]
    fn test_internal_errors() {
        let err = SyntaxError::NoRule {
            nonterminal: Nonterminal::Scope,
            lookahead: Terminal::AnyChar,
            position: 0,
        };
        assert!(err.is_internal());
        assert_eq!(codes::describe(err.error_code()).severity, codes::Severity::Critical);
        assert!(err.span().is_none());

        let semantic: SyntaxError = SemanticError::ScopeUnderflow {
            closer: Terminal::RightParen,
            span: Span::dummy(),
        }
        .into();
        assert!(semantic.is_internal());
        assert_eq!(semantic.error_code(), codes::semantic::SCOPE_UNDERFLOW);
    }
}

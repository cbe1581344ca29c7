//! The three semantic routines
//!
//! Each receives the most recently matched terminal. They only touch
//! [`ParseState`]; the parse stack is never visible here.

use super::state::ParseState;
use crate::grammar::SemanticRoutine;
use crate::logging::{codes, Code};
use crate::tokens::{SpannedTerminal, Terminal};
use crate::utils::Span;

pub type SemanticResult<T> = Result<T, SemanticError>;

/// Routine preconditions that the grammar should make impossible
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("exit-scope for '{closer}' at {span} with no open scope")]
    ScopeUnderflow { closer: Terminal, span: Span },

    #[error("exit-scope for '{closer}' at {span} does not close '{opener}' opened on line {opened_line}")]
    ScopeMismatch {
        opener: Terminal,
        opened_line: u32,
        closer: Terminal,
        span: Span,
    },
}

impl SemanticError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::ScopeUnderflow { .. } => codes::semantic::SCOPE_UNDERFLOW,
            Self::ScopeMismatch { .. } => codes::semantic::SCOPE_MISMATCH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::ScopeUnderflow { span, .. } | Self::ScopeMismatch { span, .. } => *span,
        }
    }
}

/// Count the opener, record it on the current line and open a scope
pub fn enter_scope(token: &SpannedTerminal, state: &mut ParseState) {
    state.record_bracket(token.value);
    state.push_scope(token.value, token.span);
}

/// Count the closer, record it on the current line and close the innermost scope
pub fn exit_scope(token: &SpannedTerminal, state: &mut ParseState) -> SemanticResult<()> {
    let closer = token.value;
    let Some(innermost) = state.innermost_scope() else {
        return Err(SemanticError::ScopeUnderflow {
            closer,
            span: token.span,
        });
    };

    if innermost.bracket.matching_closer() != Some(closer) {
        return Err(SemanticError::ScopeMismatch {
            opener: innermost.bracket,
            opened_line: innermost.line,
            closer,
            span: token.span,
        });
    }

    state.record_bracket(closer);
    state.pop_scope();
    Ok(())
}

/// Advance to the next line and give it an empty bracket list
pub fn count_line(_token: &SpannedTerminal, state: &mut ParseState) {
    state.begin_line();
}

pub fn execute(
    routine: SemanticRoutine,
    token: &SpannedTerminal,
    state: &mut ParseState,
) -> SemanticResult<()> {
    match routine {
        SemanticRoutine::EnterScope => enter_scope(token, state),
        SemanticRoutine::ExitScope => exit_scope(token, state)?,
        SemanticRoutine::CountLine => count_line(token, state),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Spanned};
    use assert_matches::assert_matches;

    fn token(terminal: Terminal, line: u32) -> SpannedTerminal {
        Spanned::new(terminal, Span::point(Position::new(0, line, 1)))
    }

    #[test]
    fn test_enter_then_exit() {
        let mut state = ParseState::new();
        execute(SemanticRoutine::EnterScope, &token(Terminal::LeftBracket, 1), &mut state).unwrap();
        assert_eq!(state.scope_depth(), 1);
        assert_eq!(state.bracket_count(), 1);

        execute(SemanticRoutine::ExitScope, &token(Terminal::RightBracket, 1), &mut state).unwrap();
        assert_eq!(state.scope_depth(), 0);
        assert_eq!(state.bracket_count(), 2);
        assert_eq!(
            state.line_map().get(&1),
            Some(&vec![Terminal::LeftBracket, Terminal::RightBracket])
        );
    }

    #[test]
    fn test_brackets_land_on_current_line() {
        let mut state = ParseState::new();
        enter_scope(&token(Terminal::LeftParen, 1), &mut state);
        count_line(&token(Terminal::Newline, 1), &mut state);
        count_line(&token(Terminal::Newline, 2), &mut state);
        exit_scope(&token(Terminal::RightParen, 3), &mut state).unwrap();

        let lines: Vec<(u32, usize)> = state
            .line_map()
            .iter()
            .map(|(line, brackets)| (*line, brackets.len()))
            .collect();
        assert_eq!(lines, vec![(1, 1), (2, 0), (3, 1)]);
        assert_eq!(state.current_line(), 3);
    }

    #[test]
    fn test_exit_with_nothing_open() {
        let mut state = ParseState::new();
        let result = exit_scope(&token(Terminal::RightBrace, 1), &mut state);

        assert_matches!(
            result,
            Err(SemanticError::ScopeUnderflow { closer: Terminal::RightBrace, .. })
        );
        assert_eq!(state.bracket_count(), 0);
    }

    #[test]
    fn test_exit_with_wrong_closer() {
        let mut state = ParseState::new();
        enter_scope(&token(Terminal::LeftParen, 1), &mut state);
        let err = exit_scope(&token(Terminal::RightBracket, 1), &mut state).unwrap_err();

        assert_matches!(
            err,
            SemanticError::ScopeMismatch {
                opener: Terminal::LeftParen,
                closer: Terminal::RightBracket,
                opened_line: 1,
                ..
            }
        );
        assert_eq!(err.error_code(), codes::semantic::SCOPE_MISMATCH);
        assert_eq!(state.scope_depth(), 1);
    }
}

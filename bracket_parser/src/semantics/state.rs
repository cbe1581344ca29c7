//! Per-parse mutable state shared by the semantic routines

use crate::tokens::Terminal;
use crate::utils::Span;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bracket terminals per line, in encounter order
pub type LineMap = BTreeMap<u32, Vec<Terminal>>;

/// One open, not yet closed bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopeEntry {
    pub bracket: Terminal,
    /// Depth after this bracket opened (1 for an outermost scope)
    pub depth: usize,
    pub line: u32,
    pub span: Span,
}

/// Created fresh for every parse and owned by it.
///
/// The scope depth is the scope stack length, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState {
    current_line: u32,
    bracket_count: usize,
    scope_stack: Vec<ScopeEntry>,
    lines: LineMap,
}

impl ParseState {
    pub fn new() -> Self {
        let mut lines = LineMap::new();
        lines.insert(1, Vec::new());
        Self {
            current_line: 1,
            bracket_count: 0,
            scope_stack: Vec::new(),
            lines,
        }
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }

    pub fn bracket_count(&self) -> usize {
        self.bracket_count
    }

    pub fn scope_stack(&self) -> &[ScopeEntry] {
        &self.scope_stack
    }

    /// Top of the scope stack
    pub fn innermost_scope(&self) -> Option<&ScopeEntry> {
        self.scope_stack.last()
    }

    pub fn line_map(&self) -> &LineMap {
        &self.lines
    }

    /// Record a bracket on the current line and bump the counter
    pub(crate) fn record_bracket(&mut self, bracket: Terminal) {
        self.bracket_count += 1;
        self.lines.entry(self.current_line).or_default().push(bracket);
    }

    pub(crate) fn push_scope(&mut self, bracket: Terminal, span: Span) -> &ScopeEntry {
        let entry = ScopeEntry {
            bracket,
            depth: self.scope_stack.len() + 1,
            line: self.current_line,
            span,
        };
        self.scope_stack.push(entry);
        &self.scope_stack[self.scope_stack.len() - 1]
    }

    pub(crate) fn pop_scope(&mut self) -> Option<ScopeEntry> {
        self.scope_stack.pop()
    }

    pub(crate) fn begin_line(&mut self) {
        self.current_line += 1;
        self.lines.insert(self.current_line, Vec::new());
    }

    /// Discard everything recorded so far
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Final bracket count and line map
    pub fn into_parts(self) -> (usize, LineMap) {
        (self.bracket_count, self.lines)
    }
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = ParseState::new();
        assert_eq!(state.current_line(), 1);
        assert_eq!(state.scope_depth(), 0);
        assert_eq!(state.bracket_count(), 0);
        assert!(state.innermost_scope().is_none());
        assert_eq!(state.line_map().len(), 1);
        assert_eq!(state.line_map().get(&1), Some(&Vec::new()));
    }

    #[test]
    fn test_clear_restores_fresh_state() {
        let mut state = ParseState::new();
        state.record_bracket(Terminal::LeftParen);
        state.push_scope(Terminal::LeftParen, Span::dummy());
        state.begin_line();

        state.clear();
        assert_eq!(state, ParseState::new());
    }

    #[test]
    fn test_depth_follows_stack() {
        let mut state = ParseState::new();
        let depth = state.push_scope(Terminal::LeftBrace, Span::dummy()).depth;
        assert_eq!(depth, 1);
        state.begin_line();
        let inner = *state.push_scope(Terminal::LeftParen, Span::dummy());
        assert_eq!(inner.depth, 2);
        assert_eq!(inner.line, 2);
        assert_eq!(state.scope_depth(), 2);

        assert_eq!(state.pop_scope().map(|e| e.bracket), Some(Terminal::LeftParen));
        assert_eq!(state.scope_depth(), 1);
    }
}

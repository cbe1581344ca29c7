//! Positioned terminal sequences

use super::terminal::Terminal;
use crate::utils::{Position, Span, Spanned};

pub type SpannedTerminal = Spanned<Terminal>;

/// Terminals in input order, terminated by exactly one end-of-stream sentinel
/// when built through [`TokenStreamBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<SpannedTerminal>,
}

impl TokenStream {
    /// Wrap an already-built sequence without adding a sentinel
    pub fn from_tokens(tokens: Vec<SpannedTerminal>) -> Self {
        Self { tokens }
    }

    pub fn get(&self, position: usize) -> Option<&SpannedTerminal> {
        self.tokens.get(position)
    }

    pub fn terminal_at(&self, position: usize) -> Option<Terminal> {
        self.tokens.get(position).map(|t| t.value)
    }

    /// Token count including the sentinel
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens that came from real input characters
    pub fn input_len(&self) -> usize {
        if self.ends_with_end_of_stream() {
            self.tokens.len() - 1
        } else {
            self.tokens.len()
        }
    }

    pub fn ends_with_end_of_stream(&self) -> bool {
        matches!(
            self.tokens.last(),
            Some(t) if t.value == Terminal::EndOfStream
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpannedTerminal> {
        self.tokens.iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a SpannedTerminal;
    type IntoIter = std::slice::Iter<'a, SpannedTerminal>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Accumulates classified characters and their positions
#[derive(Debug)]
pub struct TokenStreamBuilder {
    tokens: Vec<SpannedTerminal>,
    position: Position,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity + 1),
            position: Position::start(),
        }
    }

    /// Classify `ch`, record it at the current position and advance
    pub fn push_char(&mut self, ch: char) -> Terminal {
        let terminal = Terminal::classify(ch);
        let span = Span::of_char(self.position, ch);
        self.tokens.push(Spanned::new(terminal, span));
        self.position = self.position.advance(ch);
        terminal
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Append the end-of-stream sentinel just past the input
    pub fn finish(mut self) -> TokenStream {
        self.tokens
            .push(Spanned::new(Terminal::EndOfStream, Span::point(self.position)));
        TokenStream {
            tokens: self.tokens,
        }
    }
}

impl Default for TokenStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Source location tracking
//!
//! Every terminal produced by the lexical classifier carries a [`Span`], so
//! diagnostics can point at the exact character that broke the nesting.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Position immediately after `ch`
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self::new(self.offset + 1, self.line + 1, 1),
            '\t' => Self::new(
                self.offset + 1,
                self.line,
                self.column + 4 - ((self.column - 1) % 4),
            ),
            _ => Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Span covering exactly `ch` at `pos`
    pub fn of_char(pos: Position, ch: char) -> Self {
        Self::new(pos, pos.advance(ch))
    }

    /// Zero-width span at `pos`, used for the end-of-stream sentinel
    pub fn point(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    /// Line on which the span starts
    pub fn line(&self) -> u32 {
        self.start.line
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Unknown span for synthesized values
    pub fn dummy() -> Self {
        Self::point(Position::start())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// A value with its source location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Map the value while preserving the span
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Line index over a source text, used to render error snippets
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    source: &'a str,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Text of a 1-based line without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<&'a str> {
        let idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Render the line containing `span` with a caret marker underneath
    pub fn snippet(&self, span: &Span) -> Option<String> {
        let line = self.get_line(span.start.line)?;
        let gutter = span.start.line.to_string();
        let padding = " ".repeat(gutter.len());
        let indent = " ".repeat(span.start.column.saturating_sub(1) as usize);
        let carets = if span.start.line == span.end.line {
            (span.end.column.saturating_sub(span.start.column) as usize).max(1)
        } else {
            1
        };

        Some(format!(
            "{padding} |\n{gutter} | {line}\n{padding} | {indent}{}",
            "^".repeat(carets)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_columns() {
        let pos = Position::start().advance('a').advance('(');
        assert_eq!(pos, Position::new(2, 1, 3));

        let next_line = pos.advance('\n');
        assert_eq!(next_line.line, 2);
        assert_eq!(next_line.column, 1);

        let tabbed = Position::start().advance('\t');
        assert_eq!(tabbed.column, 5);
    }

    #[test]
    fn test_multibyte_offsets() {
        let pos = Position::start().advance('é');
        assert_eq!(pos.offset, 2);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_span_helpers() {
        let span = Span::of_char(Position::start(), '[');
        assert_eq!(span.len(), 1);
        assert_eq!(span.line(), 1);
        assert_eq!(span.to_string(), "1:1");

        let eos = Span::point(Position::new(5, 2, 3));
        assert!(eos.is_empty());
    }

    #[test]
    fn test_source_map_lines() {
        let map = SourceMap::new("(a\n[b)c]\n");
        assert_eq!(map.get_line(1), Some("(a"));
        assert_eq!(map.get_line(2), Some("[b)c]"));
        assert_eq!(map.get_line(3), Some(""));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(4), None);
    }

    #[test]
    fn test_snippet_points_at_column() {
        let source = "(a\n[b)c]";
        let map = SourceMap::new(source);
        let span = Span::of_char(Position::new(6, 2, 4), ')');

        let snippet = map.snippet(&span).unwrap();
        let lines: Vec<&str> = snippet.lines().collect();
        assert_eq!(lines[1], "2 | [b)c]");
        assert_eq!(lines[2], "  |    ^");
    }
}

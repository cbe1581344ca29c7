//! The terminal alphabet consumed by the parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input categories recognised by the classifier, plus the two grammar-only
/// markers [`Terminal::Epsilon`] and [`Terminal::EndOfStream`].
///
/// The discriminants double as parse table column indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Terminal {
    LeftParen = 0,
    RightParen = 1,
    LeftBracket = 2,
    RightBracket = 3,
    LeftBrace = 4,
    RightBrace = 5,
    AnyChar = 6,
    Newline = 7,
    /// Empty production marker; never produced from input
    Epsilon = 8,
    /// Sentinel appended once after the real input
    EndOfStream = 9,
}

impl Terminal {
    pub const COUNT: usize = 10;

    pub const ALL: [Terminal; Terminal::COUNT] = [
        Terminal::LeftParen,
        Terminal::RightParen,
        Terminal::LeftBracket,
        Terminal::RightBracket,
        Terminal::LeftBrace,
        Terminal::RightBrace,
        Terminal::AnyChar,
        Terminal::Newline,
        Terminal::Epsilon,
        Terminal::EndOfStream,
    ];

    /// Classify one input character. Total: every character maps to exactly one terminal.
    pub fn classify(ch: char) -> Self {
        match ch {
            '(' => Terminal::LeftParen,
            ')' => Terminal::RightParen,
            '[' => Terminal::LeftBracket,
            ']' => Terminal::RightBracket,
            '{' => Terminal::LeftBrace,
            '}' => Terminal::RightBrace,
            '\n' => Terminal::Newline,
            _ => Terminal::AnyChar,
        }
    }

    /// Parse table column
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_opener(self) -> bool {
        matches!(
            self,
            Terminal::LeftParen | Terminal::LeftBracket | Terminal::LeftBrace
        )
    }

    pub fn is_closer(self) -> bool {
        matches!(
            self,
            Terminal::RightParen | Terminal::RightBracket | Terminal::RightBrace
        )
    }

    pub fn is_bracket(self) -> bool {
        self.is_opener() || self.is_closer()
    }

    /// The closer that ends a scope opened by `self`
    pub fn matching_closer(self) -> Option<Terminal> {
        match self {
            Terminal::LeftParen => Some(Terminal::RightParen),
            Terminal::LeftBracket => Some(Terminal::RightBracket),
            Terminal::LeftBrace => Some(Terminal::RightBrace),
            _ => None,
        }
    }

    /// Short form used in tables and diagnostics
    pub fn symbol(self) -> &'static str {
        match self {
            Terminal::LeftParen => "(",
            Terminal::RightParen => ")",
            Terminal::LeftBracket => "[",
            Terminal::RightBracket => "]",
            Terminal::LeftBrace => "{",
            Terminal::RightBrace => "}",
            Terminal::AnyChar => "any",
            Terminal::Newline => "\\n",
            Terminal::Epsilon => "ε",
            Terminal::EndOfStream => "$",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Terminal::LeftParen => "left-paren",
            Terminal::RightParen => "right-paren",
            Terminal::LeftBracket => "left-bracket",
            Terminal::RightBracket => "right-bracket",
            Terminal::LeftBrace => "left-brace",
            Terminal::RightBrace => "right-brace",
            Terminal::AnyChar => "any-other-character",
            Terminal::Newline => "newline",
            Terminal::Epsilon => "epsilon",
            Terminal::EndOfStream => "end-of-stream",
        }
    }

    /// How the terminal reads in a user-facing message
    pub fn describe(self) -> String {
        match self {
            Terminal::EndOfStream => "end of input".to_string(),
            Terminal::Newline => "newline".to_string(),
            Terminal::AnyChar => "character".to_string(),
            Terminal::Epsilon => "epsilon".to_string(),
            bracket => format!("'{}'", bracket.symbol()),
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

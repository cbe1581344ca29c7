//! Grammar alphabet: nonterminals, semantic routines and the symbol union

use crate::tokens::Terminal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Nonterminal {
    /// Any run of ignorable characters, newlines and nested scopes
    Sequence = 0,
    /// One bracket-delimited region
    Scope = 1,
}

impl Nonterminal {
    pub const COUNT: usize = 2;

    pub const ALL: [Nonterminal; Nonterminal::COUNT] = [Nonterminal::Sequence, Nonterminal::Scope];

    /// Parse table row
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Nonterminal::Sequence => "Sequence",
            Nonterminal::Scope => "Scope",
        }
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Side-effecting markers interleaved with grammar symbols
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SemanticRoutine {
    EnterScope,
    ExitScope,
    CountLine,
}

impl SemanticRoutine {
    pub const ALL: [SemanticRoutine; 3] = [
        SemanticRoutine::EnterScope,
        SemanticRoutine::ExitScope,
        SemanticRoutine::CountLine,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SemanticRoutine::EnterScope => "enter-scope",
            SemanticRoutine::ExitScope => "exit-scope",
            SemanticRoutine::CountLine => "count-line",
        }
    }
}

impl fmt::Display for SemanticRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name())
    }
}

/// Element of a rule body and of the parse stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrammarSymbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
    Routine(SemanticRoutine),
}

impl GrammarSymbol {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, GrammarSymbol::Terminal(Terminal::Epsilon))
    }

    pub fn as_terminal(&self) -> Option<Terminal> {
        match self {
            GrammarSymbol::Terminal(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_nonterminal(&self) -> Option<Nonterminal> {
        match self {
            GrammarSymbol::Nonterminal(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Terminal> for GrammarSymbol {
    fn from(terminal: Terminal) -> Self {
        GrammarSymbol::Terminal(terminal)
    }
}

impl From<Nonterminal> for GrammarSymbol {
    fn from(nonterminal: Nonterminal) -> Self {
        GrammarSymbol::Nonterminal(nonterminal)
    }
}

impl From<SemanticRoutine> for GrammarSymbol {
    fn from(routine: SemanticRoutine) -> Self {
        GrammarSymbol::Routine(routine)
    }
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSymbol::Terminal(t) => write!(f, "{}", t),
            GrammarSymbol::Nonterminal(n) => write!(f, "{}", n),
            GrammarSymbol::Routine(r) => write!(f, "{}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonterminal_rows() {
        for (row, nonterminal) in Nonterminal::ALL.iter().enumerate() {
            assert_eq!(nonterminal.index(), row);
        }
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(GrammarSymbol::from(Nonterminal::Scope).to_string(), "Scope");
        assert_eq!(
            GrammarSymbol::from(SemanticRoutine::CountLine).to_string(),
            "[count-line]"
        );
        assert_eq!(GrammarSymbol::from(Terminal::LeftBrace).to_string(), "{");
    }

    #[test]
    fn test_symbol_accessors() {
        assert!(GrammarSymbol::from(Terminal::Epsilon).is_epsilon());
        assert!(!GrammarSymbol::from(Terminal::EndOfStream).is_epsilon());
        assert_eq!(
            GrammarSymbol::from(Nonterminal::Sequence).as_nonterminal(),
            Some(Nonterminal::Sequence)
        );
        assert_eq!(GrammarSymbol::from(SemanticRoutine::EnterScope).as_terminal(), None);
    }
}

//! The fixed production set

use super::symbols::{GrammarSymbol, Nonterminal, SemanticRoutine};
use crate::tokens::Terminal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Index into [`RULES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u8);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub lhs: Nonterminal,
    pub rhs: &'static [GrammarSymbol],
}

impl Rule {
    /// True for the single epsilon production
    pub fn is_empty_production(&self) -> bool {
        self.rhs.iter().all(GrammarSymbol::is_epsilon)
    }

    /// Grammar symbols only, routines removed
    pub fn grammar_symbols(&self) -> impl Iterator<Item = &GrammarSymbol> {
        self.rhs
            .iter()
            .filter(|symbol| !matches!(symbol, GrammarSymbol::Routine(_)))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} →", self.lhs)?;
        for symbol in self.rhs {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

use GrammarSymbol::{Nonterminal as N, Routine as A, Terminal as T};

const SEQ: GrammarSymbol = N(Nonterminal::Sequence);
const SCOPE: GrammarSymbol = N(Nonterminal::Scope);
const ENTER: GrammarSymbol = A(SemanticRoutine::EnterScope);
const EXIT: GrammarSymbol = A(SemanticRoutine::ExitScope);

pub const RULE_COUNT: usize = 7;

/// Productions in rule-index order
pub static RULES: [Rule; RULE_COUNT] = [
    Rule {
        id: RuleId(0),
        lhs: Nonterminal::Sequence,
        rhs: &[SCOPE, SEQ],
    },
    Rule {
        id: RuleId(1),
        lhs: Nonterminal::Sequence,
        rhs: &[T(Terminal::AnyChar), SEQ],
    },
    Rule {
        id: RuleId(2),
        lhs: Nonterminal::Sequence,
        rhs: &[T(Terminal::Newline), A(SemanticRoutine::CountLine), SEQ],
    },
    Rule {
        id: RuleId(3),
        lhs: Nonterminal::Sequence,
        rhs: &[T(Terminal::Epsilon)],
    },
    Rule {
        id: RuleId(4),
        lhs: Nonterminal::Scope,
        rhs: &[T(Terminal::LeftParen), ENTER, SEQ, T(Terminal::RightParen), EXIT],
    },
    Rule {
        id: RuleId(5),
        lhs: Nonterminal::Scope,
        rhs: &[T(Terminal::LeftBracket), ENTER, SEQ, T(Terminal::RightBracket), EXIT],
    },
    Rule {
        id: RuleId(6),
        lhs: Nonterminal::Scope,
        rhs: &[T(Terminal::LeftBrace), ENTER, SEQ, T(Terminal::RightBrace), EXIT],
    },
];

pub fn rule(id: RuleId) -> Option<&'static Rule> {
    RULES.get(id.index())
}

pub fn rules_for(lhs: Nonterminal) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |rule| rule.lhs == lhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_positions() {
        for (index, rule) in RULES.iter().enumerate() {
            assert_eq!(rule.id.index(), index);
        }
        assert!(rule(RuleId(7)).is_none());
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(RULES[0].to_string(), "Sequence → Scope Sequence");
        assert_eq!(RULES[2].to_string(), "Sequence → \\n [count-line] Sequence");
        assert_eq!(RULES[3].to_string(), "Sequence → ε");
        assert_eq!(
            RULES[5].to_string(),
            "Scope → [ [enter-scope] Sequence ] [exit-scope]"
        );
        assert_eq!(RuleId(4).to_string(), "R4");
    }

    #[test]
    fn test_partition_by_lhs() {
        assert_eq!(rules_for(Nonterminal::Sequence).count(), 4);
        assert_eq!(rules_for(Nonterminal::Scope).count(), 3);
        assert!(RULES[3].is_empty_production());
        assert!(!RULES[1].is_empty_production());
    }

    #[test]
    fn test_scope_rules_open_and_close_the_same_kind() {
        for rule in rules_for(Nonterminal::Scope) {
            let terminals: Vec<Terminal> = rule.rhs.iter().filter_map(|s| s.as_terminal()).collect();
            assert_eq!(terminals.len(), 2);
            assert_eq!(terminals[0].matching_closer(), Some(terminals[1]));
            assert_eq!(rule.grammar_symbols().count(), 3);
        }
    }
}

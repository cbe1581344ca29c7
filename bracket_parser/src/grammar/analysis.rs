//! Nullable, FIRST and FOLLOW sets, and table derivation from them
//!
//! Routine markers and epsilon are transparent: they contribute nothing to a
//! FIRST set and never block nullability.

use super::error::GrammarError;
use super::rules::{Rule, RULES};
use super::symbols::{GrammarSymbol, Nonterminal};
use super::table::{ParseTable, TableEntry};
use crate::tokens::Terminal;
use std::collections::{BTreeMap, BTreeSet};

pub type TerminalSet = BTreeSet<Terminal>;

/// Start symbol of the grammar
pub const START: Nonterminal = Nonterminal::Sequence;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarAnalysis {
    pub nullable: BTreeSet<Nonterminal>,
    pub first: BTreeMap<Nonterminal, TerminalSet>,
    pub follow: BTreeMap<Nonterminal, TerminalSet>,
}

impl GrammarAnalysis {
    /// Run all fixpoints over `rules`
    pub fn compute(rules: &[Rule]) -> Self {
        let mut analysis = Self::default();
        for nonterminal in Nonterminal::ALL {
            analysis.first.insert(nonterminal, TerminalSet::new());
            analysis.follow.insert(nonterminal, TerminalSet::new());
        }
        analysis.compute_first(rules);
        analysis.compute_follow(rules);
        analysis
    }

    pub fn is_nullable(&self, nonterminal: Nonterminal) -> bool {
        self.nullable.contains(&nonterminal)
    }

    pub fn first_of(&self, nonterminal: Nonterminal) -> &TerminalSet {
        &self.first[&nonterminal]
    }

    pub fn follow_of(&self, nonterminal: Nonterminal) -> &TerminalSet {
        &self.follow[&nonterminal]
    }

    /// FIRST of a symbol string and whether the whole string can vanish
    pub fn first_of_symbols(&self, symbols: &[GrammarSymbol]) -> (TerminalSet, bool) {
        let mut first = TerminalSet::new();
        for symbol in symbols {
            match symbol {
                GrammarSymbol::Routine(_) => continue,
                GrammarSymbol::Terminal(Terminal::Epsilon) => continue,
                GrammarSymbol::Terminal(terminal) => {
                    first.insert(*terminal);
                    return (first, false);
                }
                GrammarSymbol::Nonterminal(nonterminal) => {
                    first.extend(self.first_of(*nonterminal).iter().copied());
                    if !self.is_nullable(*nonterminal) {
                        return (first, false);
                    }
                }
            }
        }
        (first, true)
    }

    fn compute_first(&mut self, rules: &[Rule]) {
        loop {
            let mut changed = false;
            for rule in rules {
                let (first, nullable) = self.first_of_symbols(rule.rhs);
                let Some(set) = self.first.get_mut(&rule.lhs) else {
                    continue;
                };
                let before = set.len();
                set.extend(first);
                changed |= set.len() != before;

                if nullable {
                    changed |= self.nullable.insert(rule.lhs);
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn compute_follow(&mut self, rules: &[Rule]) {
        if let Some(set) = self.follow.get_mut(&START) {
            set.insert(Terminal::EndOfStream);
        }

        loop {
            let mut changed = false;
            for rule in rules {
                for (position, symbol) in rule.rhs.iter().enumerate() {
                    let GrammarSymbol::Nonterminal(target) = symbol else {
                        continue;
                    };
                    let (mut additions, rest_nullable) =
                        self.first_of_symbols(&rule.rhs[position + 1..]);
                    if rest_nullable {
                        additions.extend(self.follow_of(rule.lhs).iter().copied());
                    }

                    if let Some(set) = self.follow.get_mut(target) {
                        let before = set.len();
                        set.extend(additions);
                        changed |= set.len() != before;
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }
}

/// Build the prediction table for `rules`, failing on the first conflict
pub fn derive_table(rules: &[Rule]) -> Result<ParseTable, GrammarError> {
    let analysis = GrammarAnalysis::compute(rules);
    let mut table = ParseTable::empty();

    for rule in rules {
        let (mut predict, nullable) = analysis.first_of_symbols(rule.rhs);
        if nullable {
            predict.extend(analysis.follow_of(rule.lhs).iter().copied());
        }

        for terminal in predict {
            match table.lookup(rule.lhs, terminal) {
                TableEntry::NoRule => table.set(rule.lhs, terminal, TableEntry::Rule(rule.id)),
                TableEntry::Rule(existing) if existing == rule.id => {}
                TableEntry::Rule(existing) => {
                    return Err(GrammarError::Conflict {
                        nonterminal: rule.lhs,
                        terminal,
                        existing,
                        incoming: rule.id,
                    })
                }
            }
        }
    }

    Ok(table)
}

/// Table derived from the built-in rule set
pub fn derive_parse_table() -> Result<ParseTable, GrammarError> {
    derive_table(&RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::rules::RuleId;
    use crate::grammar::table::PARSE_TABLE;
    use assert_matches::assert_matches;

    fn set(terminals: &[Terminal]) -> TerminalSet {
        terminals.iter().copied().collect()
    }

    #[test]
    fn test_nullable() {
        let analysis = GrammarAnalysis::compute(&RULES);
        assert!(analysis.is_nullable(Nonterminal::Sequence));
        assert!(!analysis.is_nullable(Nonterminal::Scope));
    }

    #[test]
    fn test_first_sets() {
        let analysis = GrammarAnalysis::compute(&RULES);
        use Terminal::*;
        assert_eq!(
            analysis.first_of(Nonterminal::Scope),
            &set(&[LeftParen, LeftBracket, LeftBrace])
        );
        assert_eq!(
            analysis.first_of(Nonterminal::Sequence),
            &set(&[LeftParen, LeftBracket, LeftBrace, AnyChar, Newline])
        );
    }

    #[test]
    fn test_follow_sets() {
        let analysis = GrammarAnalysis::compute(&RULES);
        use Terminal::*;
        assert_eq!(
            analysis.follow_of(Nonterminal::Sequence),
            &set(&[RightParen, RightBracket, RightBrace, EndOfStream])
        );

        let scope_follow = analysis.follow_of(Nonterminal::Scope);
        assert_eq!(scope_follow.len(), Terminal::COUNT - 1);
        assert!(!scope_follow.contains(&Epsilon));
    }

    #[test]
    fn test_first_of_symbols_skips_routines() {
        let analysis = GrammarAnalysis::compute(&RULES);
        let (first, nullable) = analysis.first_of_symbols(&RULES[2].rhs[1..]);
        assert!(nullable);
        assert!(first.contains(&Terminal::Newline));
        assert!(!first.contains(&Terminal::EndOfStream));
    }

    #[test]
    fn test_derived_table_equals_static_table() {
        let derived = derive_parse_table().unwrap();
        assert_eq!(derived, PARSE_TABLE);
    }

    #[test]
    fn test_conflicting_rules_rejected() {
        // A second epsilon production for Sequence collides with R3 on every FOLLOW terminal
        let mut rules = RULES.to_vec();
        rules.push(Rule {
            id: RuleId(7),
            lhs: Nonterminal::Sequence,
            rhs: &[GrammarSymbol::Terminal(Terminal::Epsilon)],
        });

        assert_matches!(
            derive_table(&rules),
            Err(GrammarError::Conflict {
                nonterminal: Nonterminal::Sequence,
                existing: RuleId(3),
                incoming: RuleId(7),
                ..
            })
        );
    }
}

//! LL(1) prediction table

use super::rules::{rule, Rule, RuleId};
use super::symbols::Nonterminal;
use crate::tokens::Terminal;
use std::fmt;

/// One cell of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableEntry {
    Rule(RuleId),
    NoRule,
}

impl TableEntry {
    pub fn rule_id(self) -> Option<RuleId> {
        match self {
            TableEntry::Rule(id) => Some(id),
            TableEntry::NoRule => None,
        }
    }
}

impl fmt::Display for TableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableEntry::Rule(id) => write!(f, "{}", id),
            TableEntry::NoRule => f.write_str("·"),
        }
    }
}

type Row = [TableEntry; Terminal::COUNT];

/// Indexed by [`Nonterminal::index`] then [`Terminal::index`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    cells: [Row; Nonterminal::COUNT],
}

const fn r(id: u8) -> TableEntry {
    TableEntry::Rule(RuleId(id))
}

const X: TableEntry = TableEntry::NoRule;

impl ParseTable {
    /// Table with every cell empty
    pub const fn empty() -> Self {
        Self {
            cells: [[X; Terminal::COUNT]; Nonterminal::COUNT],
        }
    }

    /// The bracket grammar's table
    pub const fn standard() -> Self {
        Self {
            cells: [
                //  (     )     [     ]     {     }    any   \n    ε     $
                [r(0), r(3), r(0), r(3), r(0), r(3), r(1), r(2), X, r(3)],
                [r(4), X, r(5), X, r(6), X, X, X, X, X],
            ],
        }
    }

    pub fn lookup(&self, nonterminal: Nonterminal, lookahead: Terminal) -> TableEntry {
        self.cells[nonterminal.index()][lookahead.index()]
    }

    /// Resolve a cell straight to its production
    pub fn rule_for(&self, nonterminal: Nonterminal, lookahead: Terminal) -> Option<&'static Rule> {
        self.lookup(nonterminal, lookahead).rule_id().and_then(rule)
    }

    pub(crate) fn set(&mut self, nonterminal: Nonterminal, lookahead: Terminal, entry: TableEntry) {
        self.cells[nonterminal.index()][lookahead.index()] = entry;
    }

    /// All cells holding a rule, row-major
    pub fn defined_entries(&self) -> Vec<(Nonterminal, Terminal, RuleId)> {
        let mut entries = Vec::new();
        for nonterminal in Nonterminal::ALL {
            for terminal in Terminal::ALL {
                if let TableEntry::Rule(id) = self.lookup(nonterminal, terminal) {
                    entries.push((nonterminal, terminal, id));
                }
            }
        }
        entries
    }

    /// Cells where `self` and `other` disagree
    pub fn differences(&self, other: &ParseTable) -> Vec<(Nonterminal, Terminal, TableEntry, TableEntry)> {
        let mut diffs = Vec::new();
        for nonterminal in Nonterminal::ALL {
            for terminal in Terminal::ALL {
                let ours = self.lookup(nonterminal, terminal);
                let theirs = other.lookup(nonterminal, terminal);
                if ours != theirs {
                    diffs.push((nonterminal, terminal, ours, theirs));
                }
            }
        }
        diffs
    }

    /// Markdown grid, one row per nonterminal
    pub fn render(&self) -> String {
        let mut out = String::from("| Nonterminal \\ Terminal |");
        for terminal in Terminal::ALL {
            out.push_str(&format!(" {} |", terminal.symbol()));
        }
        out.push_str("\n|---|");
        for _ in Terminal::ALL {
            out.push_str("---|");
        }
        for nonterminal in Nonterminal::ALL {
            out.push_str(&format!("\n| {} |", nonterminal));
            for terminal in Terminal::ALL {
                out.push_str(&format!(" {} |", self.lookup(nonterminal, terminal)));
            }
        }
        out
    }
}

impl Default for ParseTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for ParseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub static PARSE_TABLE: ParseTable = ParseTable::standard();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_row() {
        let expected = ["R0", "R3", "R0", "R3", "R0", "R3", "R1", "R2", "·", "R3"];
        for (terminal, want) in Terminal::ALL.iter().zip(expected) {
            assert_eq!(PARSE_TABLE.lookup(Nonterminal::Sequence, *terminal).to_string(), want);
        }
    }

    #[test]
    fn test_scope_row_only_accepts_openers() {
        for terminal in Terminal::ALL {
            let entry = PARSE_TABLE.lookup(Nonterminal::Scope, terminal);
            assert_eq!(entry != TableEntry::NoRule, terminal.is_opener(), "{}", terminal);
        }
        assert_eq!(
            PARSE_TABLE.rule_for(Nonterminal::Scope, Terminal::LeftBracket).map(|r| r.id),
            Some(RuleId(5))
        );
    }

    #[test]
    fn test_epsilon_column_is_empty() {
        for nonterminal in Nonterminal::ALL {
            assert_eq!(PARSE_TABLE.lookup(nonterminal, Terminal::Epsilon), TableEntry::NoRule);
        }
    }

    #[test]
    fn test_defined_entries_and_differences() {
        assert_eq!(PARSE_TABLE.defined_entries().len(), 12);
        assert!(PARSE_TABLE.differences(&ParseTable::standard()).is_empty());

        let empty = ParseTable::empty();
        assert_eq!(PARSE_TABLE.differences(&empty).len(), 12);
    }

    #[test]
    fn test_render() {
        let rendered = PARSE_TABLE.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Nonterminal \\ Terminal | ( | ) | [ | ] | { | } | any | \\n | ε | $ |");
        assert_eq!(lines[2], "| Sequence | R0 | R3 | R0 | R3 | R0 | R3 | R1 | R2 | · | R3 |");
        assert_eq!(lines[3], "| Scope | R4 | · | R5 | · | R6 | · | · | · | · | · |");
    }
}

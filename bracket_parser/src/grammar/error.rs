//! Grammar consistency errors

use super::rules::RuleId;
use super::symbols::Nonterminal;
use super::table::TableEntry;
use crate::logging::{codes, Code};
use crate::tokens::Terminal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("LL(1) conflict at [{nonterminal}, {terminal}]: {existing} and {incoming} both apply")]
    Conflict {
        nonterminal: Nonterminal,
        terminal: Terminal,
        existing: RuleId,
        incoming: RuleId,
    },

    #[error("Parse table differs from derived table at [{nonterminal}, {terminal}]: static {actual}, derived {expected} ({total} cell(s) differ)")]
    TableMismatch {
        nonterminal: Nonterminal,
        terminal: Terminal,
        expected: TableEntry,
        actual: TableEntry,
        total: usize,
    },
}

impl GrammarError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Conflict { .. } => codes::grammar::TABLE_CONFLICT,
            Self::TableMismatch { .. } => codes::grammar::TABLE_MISMATCH,
        }
    }

    /// Both variants are defects in the built-in grammar
    pub fn requires_halt(&self) -> bool {
        true
    }
}

//! The bracket grammar: alphabet, productions and the LL(1) table
//!
//! The rule set is fixed. [`analysis`] re-derives the table from the rules so
//! the hand-written [`table::PARSE_TABLE`] can be checked at startup.

pub mod analysis;
pub mod error;
pub mod rules;
pub mod symbols;
pub mod table;

pub use analysis::{derive_parse_table, GrammarAnalysis};
pub use error::GrammarError;
pub use rules::{rule, Rule, RuleId, RULES};
pub use symbols::{GrammarSymbol, Nonterminal, SemanticRoutine};
pub use table::{ParseTable, TableEntry, PARSE_TABLE};

use crate::logging::codes;

/// Check that the static table equals the one derived from the rules
pub fn verify_parse_table() -> Result<(), GrammarError> {
    verify_table(&PARSE_TABLE)
}

pub fn verify_table(table: &ParseTable) -> Result<(), GrammarError> {
    let derived = match derive_parse_table() {
        Ok(derived) => derived,
        Err(err) => {
            crate::log_error!(err.error_code(), "Grammar is not LL(1)",
                "detail" => err
            );
            return Err(err);
        }
    };

    let differences = table.differences(&derived);
    if let Some(&(nonterminal, terminal, actual, expected)) = differences.first() {
        let err = GrammarError::TableMismatch {
            nonterminal,
            terminal,
            expected,
            actual,
            total: differences.len(),
        };
        crate::log_error!(err.error_code(), "Parse table does not match grammar",
            "cells" => differences.len()
        );
        return Err(err);
    }

    crate::log_success!(
        codes::success::GRAMMAR_VERIFIED,
        "Parse table verified against grammar",
        "rules" => RULES.len(),
        "cells" => table.defined_entries().len()
    );

    Ok(())
}

/// Rules followed by the table, for `--grammar`
pub fn describe_grammar() -> String {
    let mut out = String::new();
    for rule in RULES.iter() {
        out.push_str(&format!("{}  {}\n", rule.id, rule));
    }
    out.push('\n');
    out.push_str(&PARSE_TABLE.render());
    out
}

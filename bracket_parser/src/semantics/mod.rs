//! Semantic routines and the state they mutate

pub mod actions;
pub mod state;

pub use actions::{count_line, enter_scope, execute, exit_scope, SemanticError, SemanticResult};
pub use state::{LineMap, ParseState, ScopeEntry};

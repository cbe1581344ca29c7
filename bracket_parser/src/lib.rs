//! Table-driven LL(1) checker for nested `()`, `[]` and `{}` brackets
//!
//! Input is classified into terminals, driven through a fixed grammar by an
//! explicit-stack predictive parser, and semantic routines attached to the
//! rules track scope depth, bracket count and the lines brackets occur on.

pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod semantics;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use pipeline::{process_file, process_source, PipelineError, PipelineOutput, PipelineResult};
pub use syntax::{Acceptance, LlParser, SyntaxError};
pub use tokens::Terminal;

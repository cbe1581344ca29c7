//! Terminal alphabet and token streams
//!
//! The classifier maps every input character onto one of eight input
//! terminals; the grammar adds two more (epsilon and end-of-stream). A
//! [`TokenStream`] is what the parser consumes: one positioned terminal per
//! character followed by a single end-of-stream sentinel.

pub mod terminal;
pub mod token_stream;

pub use terminal::Terminal;
pub use token_stream::{SpannedTerminal, TokenStream, TokenStreamBuilder};

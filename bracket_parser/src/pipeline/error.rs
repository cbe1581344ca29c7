use crate::file_processor::FileProcessorError;
use crate::logging::Code;
use crate::syntax::{DerivationTrace, SyntaxError};

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Syntax analysis failed: {error}")]
    SyntaxAnalysis {
        #[source]
        error: SyntaxError,
        /// Derivation up to the failure, when tracing was on
        trace: Option<Box<DerivationTrace>>,
        /// Offending source line with a caret, when tracing was on
        snippet: Option<String>,
    },
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(error) => error.error_code(),
            Self::SyntaxAnalysis { error, .. } => error.error_code(),
        }
    }

    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self {
            Self::SyntaxAnalysis { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn trace(&self) -> Option<&DerivationTrace> {
        match self {
            Self::SyntaxAnalysis { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }

    pub fn snippet(&self) -> Option<&str> {
        match self {
            Self::SyntaxAnalysis { snippet, .. } => snippet.as_deref(),
            _ => None,
        }
    }

    /// The input was read and parsed, and the parser rejected it
    pub fn is_rejection(&self) -> bool {
        matches!(self.syntax_error(), Some(error) if !error.is_internal())
    }

    /// Line printed under `Current file:` for this failure
    pub fn report_line(&self) -> String {
        match self {
            Self::SyntaxAnalysis { error, .. } => crate::diagnostics::failure_line(error),
            other => format!("Error: {}", other),
        }
    }
}

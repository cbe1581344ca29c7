//! Lexical classification: raw text to terminal stream

pub mod analyzer;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};

use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;

/// Classify `source` with default preferences
pub fn classify_source(source: &str) -> TokenStream {
    LexicalAnalyzer::new().classify(source)
}

/// Classify `source` and return the metrics alongside the stream
pub fn classify_with_metrics(
    source: &str,
    preferences: LexicalPreferences,
) -> (TokenStream, LexicalMetrics) {
    let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
    let stream = analyzer.classify(source);
    (stream, analyzer.into_metrics())
}

/// Check the codes this stage logs with are registered
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let code = codes::success::CLASSIFICATION_COMPLETE;
    if codes::get_error_metadata(code.as_str()).is_none() {
        return Err(format!(
            "Lexical code {} not found in metadata registry",
            code.as_str()
        ));
    }

    crate::log_debug!("Lexical classification initialized",
        "terminals" => crate::tokens::Terminal::COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_succeeds() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_classify_with_metrics() {
        let (stream, metrics) = classify_with_metrics("a\nb\nc", LexicalPreferences::default());
        assert_eq!(stream.input_len(), 5);
        assert_eq!(metrics.newlines, 2);
        assert_eq!(metrics.bracket_chars(), 0);
    }
}

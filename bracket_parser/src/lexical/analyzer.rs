//! Character classifier
//!
//! Turns raw text into a [`TokenStream`]. Classification is total, so there is
//! no error type: every character yields exactly one terminal and the stream
//! always ends with a single end-of-stream sentinel.

use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Terminal, TokenStream, TokenStreamBuilder};
use crate::{log_debug, log_success};
use std::collections::BTreeMap;

/// Counts gathered while classifying one input
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_chars: usize,
    pub opening_brackets: usize,
    pub closing_brackets: usize,
    pub newlines: usize,
    pub other_chars: usize,
    /// Per-terminal counts, only filled when the histogram preference is on
    pub histogram: BTreeMap<Terminal, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record(&mut self, terminal: Terminal, preferences: &LexicalPreferences) {
        self.total_chars += 1;

        match terminal {
            t if t.is_opener() => self.opening_brackets += 1,
            t if t.is_closer() => self.closing_brackets += 1,
            Terminal::Newline => self.newlines += 1,
            _ => self.other_chars += 1,
        }

        if preferences.collect_terminal_histogram {
            *self.histogram.entry(terminal).or_insert(0) += 1;
        }
    }

    pub fn bracket_chars(&self) -> usize {
        self.opening_brackets + self.closing_brackets
    }

    /// Lines in the input as the parser counts them (newlines + 1)
    pub fn line_count(&self) -> usize {
        self.newlines + 1
    }

    /// Cheap pre-check: unequal opener and closer counts can never be accepted
    pub fn brackets_balanced_by_count(&self) -> bool {
        self.opening_brackets == self.closing_brackets
    }
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Classify `source`, replacing any metrics from a previous call
    pub fn classify(&mut self, source: &str) -> TokenStream {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting classification", "bytes" => source.len());

        let mut builder = TokenStreamBuilder::with_capacity(source.len());
        for ch in source.chars() {
            let terminal = builder.push_char(ch);
            self.metrics.record(terminal, &self.preferences);
        }
        let stream = builder.finish();

        log_success!(
            codes::success::CLASSIFICATION_COMPLETE,
            "Characters classified",
            "chars" => self.metrics.total_chars,
            "brackets" => self.metrics.bracket_chars(),
            "lines" => self.metrics.line_count()
        );

        stream
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> LexicalMetrics {
        self.metrics
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_by_category() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.classify("(a[b]\nc)");

        assert_eq!(stream.len(), 9);
        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_chars, 8);
        assert_eq!(metrics.opening_brackets, 2);
        assert_eq!(metrics.closing_brackets, 2);
        assert_eq!(metrics.newlines, 1);
        assert_eq!(metrics.other_chars, 3);
        assert_eq!(metrics.line_count(), 2);
        assert!(metrics.brackets_balanced_by_count());
    }

    #[test]
    fn test_histogram_respects_preference() {
        let mut plain = LexicalAnalyzer::with_preferences(LexicalPreferences {
            collect_terminal_histogram: false,
        });
        plain.classify("((");
        assert!(plain.metrics().histogram.is_empty());

        let mut detailed = LexicalAnalyzer::with_preferences(LexicalPreferences {
            collect_terminal_histogram: true,
        });
        detailed.classify("((x");
        let histogram = &detailed.metrics().histogram;
        assert_eq!(histogram.get(&Terminal::LeftParen), Some(&2));
        assert_eq!(histogram.get(&Terminal::AnyChar), Some(&1));
        assert_eq!(histogram.get(&Terminal::EndOfStream), None);
    }

    #[test]
    fn test_metrics_reset_between_inputs() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.classify("((((");
        analyzer.classify("a");
        assert_eq!(analyzer.metrics().opening_brackets, 0);
        assert_eq!(analyzer.metrics().total_chars, 1);
    }

    #[test]
    fn test_unbalanced_counts_detected() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.classify("(()");
        assert!(!analyzer.into_metrics().brackets_balanced_by_count());
    }
}

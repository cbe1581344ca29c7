use crate::file_processor::FileMetadata;
use crate::lexical::LexicalMetrics;
use crate::syntax::{Acceptance, DerivationTrace};
use std::time::Duration;

/// Accepted input and everything measured on the way
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Path or caller-supplied label
    pub name: String,
    /// Present when the input came from a file
    pub file_metadata: Option<FileMetadata>,
    pub lexical_metrics: LexicalMetrics,
    pub acceptance: Acceptance,
    pub token_count: usize,
    pub trace: Option<DerivationTrace>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn report_lines(&self) -> Vec<String> {
        crate::diagnostics::success_lines(&self.acceptance)
    }

    pub fn log_success(&self) {
        crate::log_performance!(
            crate::logging::codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Bracket pipeline finished",
            duration = self.processing_duration,
            "input" => self.name,
            "tokens" => self.token_count,
            "brackets" => self.acceptance.bracket_count
        );
    }
}

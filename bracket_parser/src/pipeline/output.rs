use super::{PipelineError, PipelineResult};
use crate::logging::codes::{self, Severity};
use crate::syntax::ParseMetrics;
use serde::Serialize;

/// Location and code of a failure, for machine-readable output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    pub code: String,
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
    pub internal: bool,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Serialisable outcome for one input
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub file: String,
    pub accepted: bool,
    /// Exactly the lines printed in text mode
    pub report: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bracket_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_with_brackets: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ParseMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOutput>,
}

impl PipelineOutput {
    pub fn new(file: &str, outcome: &Result<PipelineResult, PipelineError>) -> Self {
        match outcome {
            Ok(result) => Self {
                file: file.to_string(),
                accepted: true,
                report: result.report_lines(),
                bracket_count: Some(result.acceptance.bracket_count),
                lines_with_brackets: Some(result.acceptance.lines_with_brackets()),
                metrics: Some(result.acceptance.metrics),
                error: None,
            },
            Err(error) => {
                let span = error.syntax_error().and_then(|e| e.span());
                let metadata = codes::describe(error.error_code());
                Self {
                    file: file.to_string(),
                    accepted: false,
                    report: vec![error.report_line()],
                    bracket_count: None,
                    lines_with_brackets: None,
                    metrics: None,
                    error: Some(ErrorOutput {
                        code: error.error_code().as_str().to_string(),
                        category: metadata.category,
                        severity: metadata.severity,
                        message: error.to_string(),
                        internal: error.syntax_error().map_or(false, |e| e.is_internal()),
                        line: span.map(|s| s.start.line),
                        column: span.map(|s| s.start.column),
                    }),
                }
            }
        }
    }
}

/// Several outputs as one JSON array
pub fn outputs_to_json(outputs: &[PipelineOutput]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outputs)
}

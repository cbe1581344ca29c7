//! File → classification → parse, with logging around each stage

mod error;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use output::{outputs_to_json, ErrorOutput, PipelineOutput};
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::RuntimeConfig;
use crate::file_processor::{FileMetadata, FileProcessor};
use crate::lexical::LexicalAnalyzer;
use crate::logging;
use crate::syntax::{self, LlParser};
use std::path::Path;
use std::time::Instant;

/// Parse in-memory text with default preferences
pub fn process_source(name: &str, source: &str) -> Result<PipelineResult, PipelineError> {
    process_source_with_config(name, source, &RuntimeConfig::default())
}

pub fn process_source_with_config(
    name: &str,
    source: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    run_stages(name, source, None, config, Instant::now())
}

/// Read and parse one file with default preferences
pub fn process_file<P: AsRef<Path>>(file_path: P) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, 0, &RuntimeConfig::default())
}

/// Read and parse one file; events logged meanwhile are attributed to it
pub fn process_file_with_config<P: AsRef<Path>>(
    file_path: P,
    file_id: usize,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let file_path = file_path.as_ref();
    let name = file_path.display().to_string();

    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        crate::log_info!("Processing file", "file" => name);

        let processor = FileProcessor::from_preferences(&config.file_processor);
        let file_result = processor.process_file(file_path)?;

        run_stages(
            &name,
            &file_result.source,
            Some(file_result.metadata.clone()),
            config,
            start_time,
        )
    })
}

fn run_stages(
    name: &str,
    source: &str,
    file_metadata: Option<FileMetadata>,
    config: &RuntimeConfig,
    start_time: Instant,
) -> Result<PipelineResult, PipelineError> {
    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
    let tokens = analyzer.classify(source);

    let mut parser = LlParser::with_preferences(config.parser.clone());
    let outcome = parser.parse(&tokens);
    syntax::log_outcome(&tokens, &outcome);
    let trace = parser.take_trace();

    let acceptance = match outcome {
        Ok(acceptance) => acceptance,
        Err(error) => {
            let snippet = if config.parser.record_trace {
                crate::diagnostics::source_snippet(&error, source)
            } else {
                None
            };
            return Err(PipelineError::SyntaxAnalysis {
                error,
                trace: trace.map(Box::new),
                snippet,
            });
        }
    };

    let result = PipelineResult {
        name: name.to_string(),
        file_metadata,
        lexical_metrics: analyzer.into_metrics(),
        acceptance,
        token_count: tokens.len(),
        trace,
        processing_duration: start_time.elapsed(),
    };
    result.log_success();

    Ok(result)
}

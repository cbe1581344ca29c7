/// Check every stage's logging setup and the parse table
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_analysis_logging()?;
    crate::syntax::init_syntax_logging()?;

    crate::grammar::verify_parse_table()
        .map_err(|e| format!("Grammar verification failed: {}", e))?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 3,
        "grammar_verified" => true
    );

    Ok(())
}

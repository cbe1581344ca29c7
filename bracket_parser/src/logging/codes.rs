//! Event codes and the metadata table behind them
//!
//! Every code a stage can log is listed in [`REGISTRY`]. Logging, error
//! reports and the cargo-style summary all read category, severity and
//! remedy from there.

use serde::Serialize;

/// Code carried by every log event and error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Registry row for one code
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMetadata {
    #[serde(skip)]
    pub code: Code,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Grammar table consistency codes
pub mod grammar {
    use super::Code;

    pub const TABLE_CONFLICT: Code = Code::new("E030");
    pub const TABLE_MISMATCH: Code = Code::new("E031");
}

/// Syntax (bracket matching) error codes
pub mod syntax {
    use super::Code;

    pub const UNMATCHED_BRACKET: Code = Code::new("E040");
    pub const NO_OPEN_SCOPE: Code = Code::new("E041");
    pub const MISSING_END_OF_STREAM: Code = Code::new("E042");

    // Engine defects, never caused by user input
    pub const NO_PARSE_RULE: Code = Code::new("E086");
    pub const STACK_EXHAUSTED: Code = Code::new("E087");
    pub const NO_CONSUMED_TOKEN: Code = Code::new("E088");
}

/// Semantic routine error codes
pub mod semantic {
    use super::Code;

    pub const SCOPE_UNDERFLOW: Code = Code::new("E060");
    pub const SCOPE_MISMATCH: Code = Code::new("E061");
}

/// Batch input discovery error codes
pub mod batch {
    use super::Code;

    pub const PATH_NOT_FOUND: Code = Code::new("E070");
    pub const NO_FILES_FOUND: Code = Code::new("E071");
    pub const TOO_MANY_FILES: Code = Code::new("E072");
    pub const DISCOVERY_IO_ERROR: Code = Code::new("E073");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I007");

    pub const CLASSIFICATION_COMPLETE: Code = Code::new("I020");

    pub const GRAMMAR_VERIFIED: Code = Code::new("I030");

    pub const INPUT_ACCEPTED: Code = Code::new("I040");
    pub const BATCH_COMPLETE: Code = Code::new("I041");
}


/// Halting error: the run cannot produce a trustworthy result
const fn fatal(
    code: Code,
    category: &'static str,
    severity: Severity,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable: false,
        requires_halt: true,
        description,
        recommended_action,
    }
}

/// Error confined to one input
const fn per_input(
    code: Code,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable,
        requires_halt: false,
        description,
        recommended_action,
    }
}

const fn done(code: Code, description: &'static str) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category: "Success",
        severity: Severity::Low,
        recoverable: true,
        requires_halt: false,
        description,
        recommended_action: "None",
    }
}

use Severity::{Critical, High, Low, Medium};

pub const REGISTRY: &[ErrorMetadata] = &[
    fatal(system::INTERNAL_ERROR, "System", Critical,
        "Critical internal error",
        "File a bug report with the input that triggered it"),
    fatal(system::INITIALIZATION_FAILURE, "System", Critical,
        "System initialization failure",
        "Check logging configuration and build limits"),
    fatal(system::CONFIGURATION_ERROR, "System", High,
        "Runtime configuration could not be loaded",
        "Check the config file path and TOML syntax"),
    per_input(file_processing::FILE_NOT_FOUND, "FileProcessing", Medium, false,
        "Input file does not exist",
        "Check the file path"),
    per_input(file_processing::INVALID_EXTENSION, "FileProcessing", Low, false,
        "Input file has the wrong extension",
        "Rename the file or drop the extension requirement"),
    per_input(file_processing::FILE_TOO_LARGE, "FileProcessing", Medium, false,
        "Input file exceeds the size limit",
        "Split the file or build with a larger max_file_size"),
    per_input(file_processing::PERMISSION_DENIED, "FileProcessing", Medium, false,
        "Input file is not readable",
        "Check file permissions"),
    per_input(file_processing::INVALID_ENCODING, "FileProcessing", Medium, false,
        "Input file is not valid UTF-8",
        "Convert the file to UTF-8"),
    per_input(file_processing::IO_ERROR, "FileProcessing", Medium, true,
        "I/O error while reading input",
        "Retry, or check the underlying device"),
    per_input(file_processing::INVALID_PATH, "FileProcessing", Low, false,
        "Path is empty or not a regular file",
        "Pass a path to a regular file"),
    per_input(file_processing::TOO_MANY_LINES, "FileProcessing", Medium, false,
        "Input file exceeds the line limit",
        "Split the file or build with a larger max_line_count"),
    fatal(grammar::TABLE_CONFLICT, "Grammar", Critical,
        "Two productions compete for the same parse table cell",
        "The grammar is not LL(1); fix the rule set"),
    fatal(grammar::TABLE_MISMATCH, "Grammar", Critical,
        "Static parse table disagrees with the table derived from the rules",
        "Regenerate the static table from the rule set"),
    fatal(syntax::UNMATCHED_BRACKET, "Syntax", High,
        "An open bracket has no matching closer",
        "Close the reported bracket with its matching delimiter"),
    fatal(syntax::NO_OPEN_SCOPE, "Syntax", High,
        "A closing bracket appeared with no bracket open",
        "Remove the stray closer or add its opener"),
    fatal(syntax::MISSING_END_OF_STREAM, "Syntax", Critical,
        "Token stream is not terminated by the end-of-stream sentinel",
        "Produce token streams through the lexical classifier"),
    fatal(syntax::NO_PARSE_RULE, "Syntax", Critical,
        "Parse table has no rule for a reachable state",
        "File a bug report; the parse table is inconsistent"),
    fatal(syntax::STACK_EXHAUSTED, "Syntax", Critical,
        "Parse stack emptied before end of stream was matched",
        "File a bug report; the rule set is inconsistent"),
    fatal(syntax::NO_CONSUMED_TOKEN, "Syntax", Critical,
        "Semantic routine ran before any terminal was matched",
        "File a bug report; a rule places a routine before its terminal"),
    fatal(semantic::SCOPE_UNDERFLOW, "Semantic", Critical,
        "Exit-scope ran with no open scope",
        "File a bug report; scope tracking is inconsistent"),
    fatal(semantic::SCOPE_MISMATCH, "Semantic", Critical,
        "Exit-scope closer does not match the innermost opener",
        "File a bug report; scope tracking is inconsistent"),
    per_input(batch::PATH_NOT_FOUND, "Batch", Medium, false,
        "Input path does not exist",
        "Check the path arguments"),
    per_input(batch::NO_FILES_FOUND, "Batch", Low, false,
        "No input files matched",
        "Check the directory contents and extension filter"),
    per_input(batch::TOO_MANY_FILES, "Batch", Medium, false,
        "Too many input files for one batch",
        "Pass fewer inputs or raise --max-files"),
    per_input(batch::DISCOVERY_IO_ERROR, "Batch", Medium, true,
        "Directory could not be read",
        "Check directory permissions"),
    done(success::OPERATION_COMPLETED_SUCCESSFULLY, "Operation completed"),
    done(success::SYSTEM_INITIALIZATION_COMPLETED, "Logging system initialized"),
    done(success::FILE_PROCESSING_SUCCESS, "Input file read"),
    done(success::FILE_DISCOVERY_COMPLETE, "Input files discovered"),
    done(success::CLASSIFICATION_COMPLETE, "Characters classified into terminals"),
    done(success::GRAMMAR_VERIFIED, "Parse table matches the derived LL(1) table"),
    done(success::INPUT_ACCEPTED, "Input accepted with all brackets matched"),
    done(success::BATCH_COMPLETE, "Batch processing finished"),
];

/// Row used for codes missing from the registry
static UNREGISTERED: ErrorMetadata = per_input(
    Code::new("UNKNOWN"),
    "Unknown",
    Medium,
    true,
    "Unknown error",
    "No specific action available",
);

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    REGISTRY.iter().find(|metadata| metadata.code.as_str() == code)
}

/// Registry row for `code`, or a generic row when it is not registered
pub fn describe(code: Code) -> &'static ErrorMetadata {
    get_error_metadata(code.as_str()).unwrap_or(&UNREGISTERED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let mut seen = HashSet::new();
        for metadata in REGISTRY {
            assert!(seen.insert(metadata.code), "{} registered twice", metadata.code);
        }
    }

    #[test]
    fn test_bracket_errors_halt() {
        assert!(describe(syntax::UNMATCHED_BRACKET).requires_halt);
        assert!(describe(syntax::NO_OPEN_SCOPE).requires_halt);
        assert_eq!(describe(syntax::NO_OPEN_SCOPE).category, "Syntax");
        assert_eq!(describe(syntax::NO_PARSE_RULE).severity, Severity::Critical);
    }

    #[test]
    fn test_unknown_code_defaults() {
        let metadata = describe(Code::new("E999"));
        assert_eq!(metadata.severity, Severity::Medium);
        assert!(metadata.recoverable);
        assert!(!metadata.requires_halt);
        assert_eq!(metadata.category, "Unknown");
        assert!(get_error_metadata("E999").is_none());
    }

    #[test]
    fn test_success_rows() {
        let metadata = describe(success::GRAMMAR_VERIFIED);
        assert_eq!(metadata.category, "Success");
        assert_eq!(metadata.recommended_action, "None");
    }

    #[test]
    fn test_metadata_serializes_without_code() {
        let value = serde_json::to_value(describe(syntax::NO_OPEN_SCOPE)).unwrap();
        assert_eq!(value["severity"], "High");
        assert_eq!(value["requires_halt"], true);
        assert!(value.get("code").is_none());
    }
}

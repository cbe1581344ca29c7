//! Reading input files under the build-time limits

mod processor;

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::log_debug;
use std::path::Path;

pub use processor::{
    count_lines, human_readable_size, FileMetadata, FileProcessingResult, FileProcessor,
    FileProcessorError,
};

/// Read a file with default preferences
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn init_file_processor_logging() -> Result<(), String> {
    let file_codes = [
        crate::logging::codes::file_processing::FILE_NOT_FOUND,
        crate::logging::codes::file_processing::INVALID_EXTENSION,
        crate::logging::codes::file_processing::FILE_TOO_LARGE,
        crate::logging::codes::file_processing::TOO_MANY_LINES,
        crate::logging::codes::success::FILE_PROCESSING_SUCCESS,
    ];

    for code in &file_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processing code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("File processor limits",
        "max_file_size" => human_readable_size(MAX_FILE_SIZE),
        "large_file_threshold" => human_readable_size(LARGE_FILE_THRESHOLD),
        "max_line_count" => MAX_LINE_COUNT
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_file_processor_logging() {
        assert!(init_file_processor_logging().is_ok());
    }
}

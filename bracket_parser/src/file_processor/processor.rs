//! Input file loading with build-time size and line limits

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .{expected}, found {found:?}")]
    InvalidExtension {
        expected: String,
        found: Option<String>,
    },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }


    fn from_io(error: &std::io::Error, path: &Path, action: &str) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            ErrorKind::NotFound => Self::FileNotFound { path },
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            ErrorKind::InvalidData => Self::InvalidEncoding { path },
            _ => Self::IoError {
                message: format!("Failed to {} '{}': {}", action, path, error),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    /// Canonical path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension without the dot
    pub extension: Option<String>,
    /// Newlines + 1, matching the parser's line numbering
    pub line_count: usize,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable_size(self.size)
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

pub fn human_readable_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut scaled = size as f64;
    let mut unit_index = 0;

    while scaled >= 1024.0 && unit_index < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size, UNITS[0])
    } else {
        format!("{:.2} {}", scaled, UNITS[unit_index])
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

/// Lines as the parser numbers them: an empty input still has line 1
pub fn count_lines(source: &str) -> usize {
    source.bytes().filter(|b| *b == b'\n').count() + 1
}

/// Reads one input file. Empty files are valid input.
pub struct FileProcessor {
    preferences: FileProcessorPreferences,
    max_file_size: u64,
    max_line_count: usize,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(preferences: &FileProcessorPreferences) -> Self {
        Self {
            preferences: preferences.clone(),
            max_file_size: MAX_FILE_SIZE,
            max_line_count: MAX_LINE_COUNT,
        }
    }

    /// Only accept files with `extension`
    pub fn with_required_extension(mut self, extension: Option<&str>) -> Self {
        self.preferences.required_extension =
            extension.map(|ext| ext.trim_start_matches('.').to_lowercase());
        self
    }

    /// Tighten the limits below the build-time maxima
    pub fn with_limits(mut self, max_file_size: u64, max_line_count: usize) -> Self {
        self.max_file_size = max_file_size.min(MAX_FILE_SIZE);
        self.max_line_count = max_line_count.min(MAX_LINE_COUNT);
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn max_line_count(&self) -> usize {
        self.max_line_count
    }

    pub fn process_file<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();

        log_debug!("Starting file processing", "file" => file_path.display());

        let path = self.validate_path(file_path)?;
        let mut metadata = self.collect_metadata(&path)?;
        self.validate_file(&metadata)?;
        let source = self.read_file(&path)?;

        metadata.line_count = count_lines(&source);
        if metadata.line_count > self.max_line_count {
            let error = FileProcessorError::TooManyLines {
                lines: metadata.line_count,
                max_lines: self.max_line_count,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => path.display(),
                "lines" => metadata.line_count,
                "max_lines" => self.max_line_count
            );
            return Err(error);
        }

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        };

        if self.preferences.log_file_metrics {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => result.metadata.path.display(),
                "size" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "large_file" => result.metadata.is_large_file()
            );
        }

        Ok(result)
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: String::new(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.display().to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path.display());
            return Err(error);
        }

        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path.display());
            return Err(error);
        }

        file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(&e, file_path, "resolve path");
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => file_path.display(),
                "io_error" => e
            );
            error
        })
    }

    fn collect_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read metadata for");
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        log_debug!("File metadata collected",
            "size_bytes" => metadata.len(),
            "extension" => extension.as_deref().unwrap_or("none")
        );

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
        })
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > self.max_file_size {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: self.max_file_size,
            };
            log_error!(error.error_code(), "File exceeds maximum size",
                "file" => metadata.path.display(),
                "size" => metadata.human_readable_size(),
                "limit" => human_readable_size(self.max_file_size)
            );
            return Err(error);
        }

        if let Some(required) = &self.preferences.required_extension {
            if metadata.extension.as_deref() != Some(required.as_str()) {
                let error = FileProcessorError::InvalidExtension {
                    expected: required.clone(),
                    found: metadata.extension.clone(),
                };
                log_error!(error.error_code(), "File does not have the required extension",
                    "file" => metadata.path.display(),
                    "extension" => metadata.extension.as_deref().unwrap_or("none"),
                    "required" => required
                );
                return Err(error);
            }
        }

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FileProcessorError> {
        fs::read_to_string(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path, "read");
            log_error!(error.error_code(), "Failed to read file",
                "file" => path.display(),
                "io_error" => e
            );
            error
        })
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

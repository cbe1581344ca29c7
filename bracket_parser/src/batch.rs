//! Input expansion and sequential multi-file processing
//!
//! Explicit file arguments keep their command-line order; directories expand
//! to their matching files in sorted order. Files are processed one after
//! another and each outcome is handed to a callback before the next file
//! starts, so output order always follows input order.

use crate::config::compile_time::batch_processing::MAX_FILES_PER_BATCH;
use crate::config::RuntimeConfig;
use crate::logging::{codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Descend into subdirectories of directory arguments
    pub recursive: bool,
    /// Cap on the number of files, never above the build-time limit
    pub max_files: Option<usize>,
    /// Progress lines on stderr
    pub progress_reporting: bool,
    /// Stop after the first failed file
    pub fail_fast: bool,
    /// Extension (no dot) that files found in directories must have
    pub extension_filter: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
            extension_filter: None,
        }
    }
}

impl BatchConfig {
    pub fn file_limit(&self) -> usize {
        self.max_files
            .map_or(MAX_FILES_PER_BATCH, |max| max.min(MAX_FILES_PER_BATCH))
    }
}

#[derive(Debug)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
    /// Set when fail-fast cut the batch short
    pub stopped_early: bool,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            successful_files: Vec::new(),
            failed_files: Vec::new(),
            processing_duration: Duration::ZERO,
            files_processed: 0,
            files_discovered: 0,
            stopped_early: false,
        }
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_files.is_empty() && !self.stopped_early
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.success_count() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("No input files found in: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error reading {path}: {error}")]
    IoError { path: String, error: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::PathNotFound { .. } => codes::batch::PATH_NOT_FOUND,
            Self::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            Self::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            Self::IoError { .. } => codes::batch::DISCOVERY_IO_ERROR,
        }
    }

    fn io(path: &Path, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}

/// Turn command-line paths into the ordered list of files to process
pub fn collect_inputs(paths: &[PathBuf], config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(discover_files(path, config)?);
        } else if names_directory(path) {
            let error = BatchError::PathNotFound {
                path: path.display().to_string(),
            };
            crate::log_error!(error.error_code(), "Input directory does not exist",
                "path" => path.display()
            );
            return Err(error);
        } else {
            // Missing files fail on their own when processed
            files.push(path.clone());
        }

        let limit = config.file_limit();
        if files.len() > limit {
            let error = BatchError::TooManyFiles {
                count: files.len(),
                max: limit,
            };
            crate::log_error!(error.error_code(), "Too many input files",
                "count" => files.len(),
                "limit" => limit
            );
            return Err(error);
        }
    }

    if files.is_empty() {
        let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        return Err(BatchError::NoFilesFound {
            path: listed.join(", "),
        });
    }

    crate::log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "Input files collected",
        "files" => files.len()
    );

    Ok(files)
}

/// A missing path written with a trailing separator was meant as a directory
fn names_directory(path: &Path) -> bool {
    let text = path.as_os_str().to_string_lossy();
    text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR)
}

/// Files under `dir_path` that pass the extension filter, sorted
pub fn discover_files(dir_path: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_debug!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::PathNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config)?;

    if files.is_empty() {
        crate::log_warning!(code = codes::batch::NO_FILES_FOUND, "Directory has no matching files",
            "directory" => dir_path.display()
        );
    }

    files.sort();
    Ok(files)
}

fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    config: &BatchConfig,
) -> Result<(), BatchError> {
    let entries = fs::read_dir(dir_path).map_err(|e| BatchError::io(dir_path, e))?;

    for entry in entries {
        let path = entry.map_err(|e| BatchError::io(dir_path, e))?.path();

        if path.is_dir() {
            if config.recursive {
                visit_directory(&path, files, config)?;
            }
        } else if path.is_file() && matches_extension(&path, config.extension_filter.as_deref()) {
            files.push(path);
        }
    }

    Ok(())
}

fn matches_extension(path: &Path, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(wanted) => path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.'))),
    }
}

/// Process `files` in order, reporting each outcome through `on_file`
pub fn process_files<F>(
    files: &[PathBuf],
    config: &BatchConfig,
    runtime: &RuntimeConfig,
    mut on_file: F,
) -> BatchResults
where
    F: FnMut(&Path, &Result<PipelineResult, PipelineError>),
{
    let start_time = Instant::now();
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    crate::log_info!("Starting batch processing", "files" => files.len());

    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            eprintln!(
                "Processing file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }

        let outcome = pipeline::process_file_with_config(file_path, file_id, runtime);
        on_file(file_path, &outcome);

        match outcome {
            Ok(result) => results.add_success(file_path.clone(), result),
            Err(error) => {
                results.add_failure(file_path.clone(), error);
                if config.fail_fast {
                    results.stopped_early = file_id + 1 < files.len();
                    crate::log_warning!("Fail-fast mode enabled, stopping batch processing",
                        "remaining" => files.len() - file_id - 1
                    );
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    results
}

/// Collect then process, in one call
pub fn process_inputs<F>(
    paths: &[PathBuf],
    config: &BatchConfig,
    runtime: &RuntimeConfig,
    on_file: F,
) -> Result<BatchResults, BatchError>
where
    F: FnMut(&Path, &Result<PipelineResult, PipelineError>),
{
    let files = collect_inputs(paths, config)?;
    Ok(process_files(&files, config, runtime, on_file))
}

//! Error types for the flightprep cleaning pipeline.
//!
//! Errors are layered the same way the pipeline is:
//!
//! - [`LoadError`] - turning uploaded bytes into a table
//! - [`StageError`] - a cleaning stage rejecting the table
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP surface errors
//!
//! Conversion is automatic via `From`, so `?` works across layers.

use thiserror::Error;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while turning raw bytes into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode text content.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV content.
    #[error("Invalid CSV at line {line}: {message}")]
    CsvError { line: usize, message: String },

    /// Workbook could not be opened or has no usable sheet.
    #[error("Invalid workbook: {0}")]
    WorkbookError(String),

    /// Empty input.
    #[error("Input file is empty")]
    EmptyFile,

    /// No header row found.
    #[error("No headers found in input")]
    NoHeaders,
}

// =============================================================================
// Stage Errors
// =============================================================================

/// Errors raised by a cleaning stage.
///
/// Every variant is fatal for the whole table: no row is skipped or nulled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// A column the stage reads is absent from the table.
    #[error("[{stage}] missing required column '{column}'")]
    MissingColumn { stage: String, column: String },

    /// A date or time value does not have the expected shape.
    #[error("[{stage}] column '{column}', row {row}: value '{value}' does not match {expected}")]
    Format {
        stage: String,
        column: String,
        row: usize,
        value: String,
        expected: String,
    },

    /// A categorical value is outside the fixed vocabulary.
    #[error("[{stage}] column '{column}', row {row}: unrecognized category '{value}'")]
    UnrecognizedCategory {
        stage: String,
        column: String,
        row: usize,
        value: String,
    },
}

impl StageError {
    pub fn missing_column(stage: &str, column: &str) -> Self {
        Self::MissingColumn {
            stage: stage.to_string(),
            column: column.to_string(),
        }
    }

    /// Column the error refers to.
    pub fn column(&self) -> &str {
        match self {
            Self::MissingColumn { column, .. }
            | Self::Format { column, .. }
            | Self::UnrecognizedCategory { column, .. } => column,
        }
    }

    /// Stage that raised the error.
    pub fn stage(&self) -> &str {
        match self {
            Self::MissingColumn { stage, .. }
            | Self::Format { stage, .. }
            | Self::UnrecognizedCategory { stage, .. } => stage,
        }
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is what [`crate::transform::pipeline::process_bytes`] and friends return.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// A stage rejected the table.
    #[error("Stage error: {0}")]
    Stage(#[from] StageError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

//! Error types for the research dataset build.
//!
//! - [`CsvError`] - Loading and decoding input tables
//! - [`SchemaError`] - Allow-list file without an identifier column
//! - [`ValidationError`] - Post-transform guardrails
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Lower-level errors convert into [`PipelineError`] via `From`, so `?`
//! works across the loader, transform and writer stages.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors while reading an input table.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed record.
    #[error("Invalid CSV format: {0}")]
    Parse(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty: {0}")]
    EmptyFile(String),

    /// A column the pipeline needs is absent.
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
}

// =============================================================================
// Allow-list Schema Errors
// =============================================================================

/// Errors in the institution allow-list file layout.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Neither `UNITID` nor `unitid` is present.
    #[error("Allow-list file '{path}' missing UNITID column: {columns:?}")]
    MissingUnitidColumn { path: PathBuf, columns: Vec<String> },

    /// The file itself could not be loaded.
    #[error(transparent)]
    Csv(#[from] CsvError),
}

// =============================================================================
// Guardrail Errors
// =============================================================================

/// Post-transform guardrail failures.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// `missing` labels the allow-listed campuses with no rows.
    #[error(
        "Expected {expected} Big Ten institutions, got {actual} (missing: {})",
        missing_list(.missing)
    )]
    InstitutionCount {
        expected: usize,
        actual: usize,
        missing: Vec<String>,
    },

    #[error("Unexpected missing cip2_title count: {0}")]
    MissingCip2Titles(usize),

    #[error("Missing cip6_title for true CIP6 codes: {0}")]
    MissingCip6Titles(usize),
}

fn missing_list(missing: &[String]) -> String {
    if missing.is_empty() {
        "none".to_string()
    } else {
        missing.join(", ")
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::build`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serializing the output table failed.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] csv::Error),

    /// Creating the output directory or writing the file failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV loading.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for allow-list loading.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for guardrail checks.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

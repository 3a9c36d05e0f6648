//! Error types for the harvester.
//!
//! Segmentation itself never fails on malformed text - candidates that
//! cannot be completed are dropped and counted. The variants here cover the
//! collaborator boundaries: input validation, transport, extraction, export.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid date format.
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD (e.g., 2025-01-01)")]
    InvalidDate(String),

    /// A pattern in the library failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Date range with start after end.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download the edition PDF.
    #[error("Failed to download edition for {date}: {source}")]
    EditionDownload {
        date: String,
        #[source]
        source: reqwest::Error,
    },

    /// All retry attempts exhausted for a transient failure.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The edition PDF could not be parsed into text.
    #[error("Failed to extract text from edition for {date}: {message}")]
    PdfExtraction { date: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV export failed: {0}")]
    CsvExport(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON export failed: {0}")]
    JsonExport(#[from] serde_json::Error),

    /// A record produced a row that does not match its declared columns.
    ///
    /// This indicates field-list/record-type drift, not a data problem.
    #[error("Schema mismatch for {kind}: declared {expected} columns, record produced {actual}")]
    SchemaMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

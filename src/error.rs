use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tools ingest, transform, or emit data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when reading or writing CSV fails.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when a data frame operation fails.
    #[error("data frame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when a workbook or table does not have the expected shape.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a sheet listed by the workbook cannot be opened.
    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    /// Raised when a value is not an `HH:MM:SS` string.
    #[error("expected a string in the format 'HH:MM:SS', got {0}")]
    TimeFormat(String),

    /// Raised when a time cell of a patient sheet cannot be converted.
    #[error("sheet '{sheet}', row {row}: expected a string in the format 'HH:MM:SS', got {value}")]
    InvalidTime {
        sheet: String,
        row: usize,
        value: String,
    },

    /// Raised when a work log timestamp does not match the configured format.
    #[error("timestamp '{value}' does not match format '{format}'")]
    InvalidTimestamp { value: String, format: String },

    /// Raised when no sheet of the workbook has a skip-row entry.
    #[error("no sheet of the workbook could be processed")]
    NoSheetsProcessed,

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

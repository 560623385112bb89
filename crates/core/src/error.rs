//! Error types for place detail normalization and export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing or exporting a place record.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a well-formed place record (not a JSON object).
    #[error("Invalid place record: {0}")]
    InvalidRecord(String),

    /// A formatter received a value outside its accepted range.
    #[error("Value {value} is out of range for {field} (expected {min}..={max})")]
    InvalidRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The host save capability failed or is unavailable.
    #[error("Failed to deliver export: {0}")]
    ExportDelivery(String),

    /// ZIP archive error (for XLSX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing error (for XLSX).
    #[error("XML writing error: {0}")]
    XmlError(String),
}

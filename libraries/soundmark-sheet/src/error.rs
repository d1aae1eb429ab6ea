/// Spreadsheet codec errors
use thiserror::Error;

/// Result type alias using `SheetError`
pub type Result<T> = std::result::Result<T, SheetError>;

/// Spreadsheet codec error types
#[derive(Error, Debug)]
pub enum SheetError {
    /// The workbook cannot be used as an import source
    #[error("Malformed spreadsheet: {0}")]
    Malformed(String),

    /// Workbook decode error
    #[error("Spreadsheet read error: {0}")]
    Read(#[from] calamine::XlsxError),

    /// Workbook encode error
    #[error("Spreadsheet write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

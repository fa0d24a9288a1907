//! Spreadsheet import/export errors.

use thiserror::Error;

/// Errors reading or writing spreadsheet rows.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Malformed CSV or a row that does not fit the column layout.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

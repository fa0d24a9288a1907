//! View configuration errors.

use thiserror::Error;

/// Errors raised while parsing view settings from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Unknown sort column name.
    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),

    /// Unknown status mode name.
    #[error("Unknown status mode: {0} (expected 'realized' or 'all')")]
    UnknownStatusMode(String),
}

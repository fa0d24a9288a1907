//! Period error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building date ranges from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month input is not `YYYY-MM`.
    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    /// Period key is neither a two-digit day nor `YYYY-MM`.
    #[error("Invalid period key: {0}")]
    InvalidKey(String),

    /// Range ends before it starts.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

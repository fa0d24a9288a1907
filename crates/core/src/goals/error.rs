//! Goal error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Goal-related errors.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Category name is blank.
    #[error("Goal category cannot be empty")]
    EmptyCategory,

    /// Limit must be strictly positive.
    #[error("Goal limit for '{category}' must be positive, got {limit}")]
    NonPositiveLimit {
        /// Category the goal was set on.
        category: String,
        /// Rejected limit.
        limit: Decimal,
    },

    /// Goal file is not a `category -> limit` map.
    #[error("Invalid goal document: {0}")]
    Parse(#[from] serde_json::Error),
}

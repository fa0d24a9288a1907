//! Goal data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::GoalError;
use crate::transaction::normalize::parse_signed_amount_text;

/// Spending ceilings keyed by category.
///
/// Deserializes from a plain `{"food": 500, "rent": "1200.00"}` document.
/// Limits read that way are not validated; the tracker skips non-positive
/// ones. Use [`Goals::insert`] or [`Goals::from_inputs`] to build a clean map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Goals(BTreeMap<String, Decimal>);

impl Goals {
    /// Creates an empty goal map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a goal document.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::Parse` if `json` is not a `category -> limit` object.
    pub fn from_json(json: &str) -> Result<Self, GoalError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds goals from editor inputs, keeping only strictly positive limits.
    ///
    /// Inputs with a blank category or a limit that does not parse are dropped.
    #[must_use]
    pub fn from_inputs<I, K, V>(inputs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut goals = Self::new();
        for (category, limit) in inputs {
            if let Some(limit) = parse_signed_amount_text(limit.as_ref()) {
                let _ = goals.insert(category.as_ref(), limit);
            }
        }
        goals
    }

    /// Sets a goal, replacing any previous limit for the category.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::EmptyCategory` for a blank category and
    /// `GoalError::NonPositiveLimit` for a limit that is zero or negative.
    pub fn insert(&mut self, category: &str, limit: Decimal) -> Result<(), GoalError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(GoalError::EmptyCategory);
        }
        if limit <= Decimal::ZERO {
            return Err(GoalError::NonPositiveLimit {
                category: category.to_string(),
                limit,
            });
        }
        self.0.insert(category.to_string(), limit);
        Ok(())
    }

    /// Limit for `category`, if any.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.0.get(category).copied()
    }

    /// Iterates `(category, limit)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(category, limit)| (category.as_str(), *limit))
    }

    /// Number of goals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no goal is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Decimal>> for Goals {
    fn from(map: BTreeMap<String, Decimal>) -> Self {
        Self(map)
    }
}

/// How close a category is to its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTier {
    /// Below 75% of the limit.
    Healthy,
    /// From 75% up to, but not including, 100%.
    Warning,
    /// At or over the limit.
    Exceeded,
}

/// Progress of one category against its goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Category.
    pub category: String,
    /// Ceiling.
    pub limit: Decimal,
    /// Expense recorded for the category in the view.
    pub spent: Decimal,
    /// `limit - spent`; negative once exceeded.
    pub remaining: Decimal,
    /// `spent / limit * 100`, capped at 100, two decimal places.
    pub percent: Decimal,
    /// Tier derived from the rounded percentage before capping.
    pub tier: GoalTier,
}

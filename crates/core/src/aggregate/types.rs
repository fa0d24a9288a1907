//! Aggregation result types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::GoalProgress;
use crate::period::{DateRange, Granularity, PeriodKey};
use crate::view::ViewConfig;

/// Range and granularity the period buckets are laid out on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketPlan {
    /// Range whose periods are zero-filled.
    pub range: DateRange,
    /// Day-of-month or month keys.
    pub granularity: Granularity,
}

impl BucketPlan {
    /// Plan using the granularity implied by `range`.
    #[must_use]
    pub fn for_range(range: DateRange) -> Self {
        let granularity = range.granularity();
        Self { range, granularity }
    }
}

impl From<&ViewConfig> for BucketPlan {
    fn from(view: &ViewConfig) -> Self {
        Self {
            range: view.range.clone(),
            granularity: view.granularity,
        }
    }
}

/// Expense-to-income ratio, tagged when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum HealthRatio {
    /// `total_expense / total_income`.
    Defined(Decimal),
    /// No income in the view.
    NoIncome,
}

impl HealthRatio {
    /// Ratio as a percentage, `None` without income. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn percent(self) -> Option<Decimal> {
        match self {
            Self::Defined(ratio) => Some(ratio.saturating_mul(Decimal::ONE_HUNDRED)),
            Self::NoIncome => None,
        }
    }
}

/// Banded reading of [`HealthRatio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    /// Expenses at most half of income.
    Comfortable,
    /// Above 50%.
    Elevated,
    /// Above 80%.
    Strained,
    /// Above 95%.
    Critical,
    /// No income.
    NoIncome,
}

/// One time bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Income dated in the bucket.
    pub income: Decimal,
    /// Expense dated in the bucket.
    pub expense: Decimal,
    /// Running `income - expense` from the first bucket through this one.
    pub net_cumulative: Decimal,
}

/// Money in and out attributed to one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyBalance {
    /// Party display name.
    pub party: String,
    /// Income attributed to the party.
    pub entries: Decimal,
    /// Expense attributed to the party.
    pub exits: Decimal,
}

impl PartyBalance {
    /// Zeroed balance for `party`.
    #[must_use]
    pub fn new(party: impl Into<String>) -> Self {
        Self {
            party: party.into(),
            entries: Decimal::ZERO,
            exits: Decimal::ZERO,
        }
    }

    /// `entries - exits`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.entries - self.exits
    }
}

/// Everything the dashboard, calendar and goal widgets read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of income values.
    pub total_income: Decimal,
    /// Sum of expense values.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub net_balance: Decimal,
    /// `total_expense / total_income`.
    pub health_ratio: HealthRatio,
    /// Band of the health ratio.
    pub health_level: HealthLevel,
    /// Expense per category.
    pub expense_by_category: BTreeMap<String, Decimal>,
    /// Expense per raw responsibility label.
    pub expense_by_responsibility: BTreeMap<String, Decimal>,
    /// Balances of the parties of interest, partners first.
    pub party_balances: Vec<PartyBalance>,
    /// Granularity of `period_buckets`.
    pub granularity: Granularity,
    /// Zero-filled buckets over the plan's range.
    pub period_buckets: BTreeMap<PeriodKey, PeriodBucket>,
    /// Goal progress, most at-risk first.
    pub goal_progress: Vec<GoalProgress>,
    /// Records aggregated, malformed ones included.
    pub record_count: usize,
    /// Records with a non-numeric value or an unusable date.
    pub skipped_records: usize,
}

impl AggregateResult {
    /// Balance of `party`, if it is a party of interest.
    #[must_use]
    pub fn party(&self, party: &str) -> Option<&PartyBalance> {
        self.party_balances.iter().find(|b| b.party == party)
    }
}

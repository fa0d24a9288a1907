//! Goal tracking against aggregated expenses.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use super::types::{GoalProgress, GoalTier, Goals};
use crate::transaction::Transaction;

const WARNING_THRESHOLD: Decimal = Decimal::from_parts(75, 0, 0, false, 0);

/// Goal service for progress calculation.
pub struct GoalService;

impl GoalService {
    /// Uncapped utilization, `spent / limit * 100`.
    ///
    /// A non-positive limit yields zero. A result too large for a `Decimal`
    /// saturates at `Decimal::MAX`.
    #[must_use]
    pub fn utilization(spent: Decimal, limit: Decimal) -> Decimal {
        if limit <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        spent
            .checked_div(limit)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    }

    /// Tier for an uncapped utilization percentage.
    #[must_use]
    pub fn tier_for(utilization: Decimal) -> GoalTier {
        if utilization >= Decimal::ONE_HUNDRED {
            GoalTier::Exceeded
        } else if utilization >= WARNING_THRESHOLD {
            GoalTier::Warning
        } else {
            GoalTier::Healthy
        }
    }

    /// Progress of a single category.
    ///
    /// The tier is read from the utilization rounded to two places, the same
    /// figure `percent` shows before capping.
    #[must_use]
    pub fn progress(category: &str, limit: Decimal, spent: Decimal) -> GoalProgress {
        let utilization = Self::utilization(spent, limit).round_dp(2);
        GoalProgress {
            category: category.to_string(),
            limit,
            spent,
            remaining: limit - spent,
            percent: utilization.min(Decimal::ONE_HUNDRED),
            tier: Self::tier_for(utilization),
        }
    }

    /// Progress for every goal, most at-risk first.
    ///
    /// Ordered by uncapped utilization descending, then by category. Goals
    /// with a non-positive limit are skipped.
    #[must_use]
    pub fn track(goals: &Goals, expense_by_category: &BTreeMap<String, Decimal>) -> Vec<GoalProgress> {
        let mut tracked: Vec<(Decimal, GoalProgress)> = goals
            .iter()
            .filter(|(category, limit)| {
                if *limit <= Decimal::ZERO {
                    tracing::warn!(category, %limit, "skipping goal with non-positive limit");
                    return false;
                }
                true
            })
            .map(|(category, limit)| {
                let spent = expense_by_category
                    .get(category)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                (
                    Self::utilization(spent, limit),
                    Self::progress(category, limit, spent),
                )
            })
            .collect();

        tracked.sort_by(|(a_util, a), (b_util, b)| match b_util.cmp(a_util) {
            Ordering::Equal => a.category.cmp(&b.category),
            other => other,
        });
        tracked.into_iter().map(|(_, progress)| progress).collect()
    }

    /// Categories a goal editor should offer: expense categories present in
    /// the snapshot plus categories that already carry a goal, sorted.
    #[must_use]
    pub fn editable_categories(snapshot: &[Transaction], goals: &Goals) -> Vec<String> {
        let mut categories: BTreeSet<String> = snapshot
            .iter()
            .filter(|tx| !tx.is_income())
            .map(|tx| tx.category.trim())
            .filter(|category| !category.is_empty())
            .map(String::from)
            .collect();
        categories.extend(goals.iter().map(|(category, _)| category.to_string()));
        categories.into_iter().collect()
    }
}

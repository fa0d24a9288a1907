//! The aggregator: folds a filtered transaction list into an [`AggregateResult`].

use std::collections::BTreeMap;

use fluxo_shared::EngineConfig;
use rust_decimal::Decimal;

use super::responsibility::{Attribution, ResponsibilityRules};
use super::types::{
    AggregateResult, BucketPlan, HealthLevel, HealthRatio, PartyBalance, PeriodBucket,
};
use crate::goals::{GoalService, Goals};
use crate::period::PeriodKey;
use crate::transaction::Transaction;
use crate::view::{ViewConfig, filter_and_sort};

const ELEVATED_ABOVE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const STRAINED_ABOVE: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const CRITICAL_ABOVE: Decimal = Decimal::from_parts(95, 0, 0, false, 0);

/// Stateless aggregation over a filtered transaction list.
///
/// Every call recomputes from scratch; there is no incremental state.
#[derive(Debug, Clone)]
pub struct Aggregator {
    rules: ResponsibilityRules,
    uncategorized_label: String,
    unassigned_label: String,
}

impl Aggregator {
    /// Creates an aggregator from engine configuration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rules: ResponsibilityRules::from_config(config),
            uncategorized_label: config.uncategorized_label.clone(),
            unassigned_label: config.unassigned_label.clone(),
        }
    }

    /// Filters and sorts `snapshot` for `view`, then aggregates the rows.
    #[must_use]
    pub fn run(
        &self,
        snapshot: &[Transaction],
        goals: &Goals,
        view: &ViewConfig,
    ) -> (Vec<Transaction>, AggregateResult) {
        let rows = filter_and_sort(snapshot, view);
        let result = self.aggregate(&rows, goals, &BucketPlan::from(view));
        (rows, result)
    }

    /// Aggregates an already filtered list.
    ///
    /// Malformed records never abort the pass: a missing value counts as zero,
    /// an unusable date keeps the record out of the period buckets, and each
    /// such record is counted once in `skipped_records`. A record whose value
    /// would overflow its total is left out entirely and counted the same way.
    #[must_use]
    pub fn aggregate(
        &self,
        filtered: &[Transaction],
        goals: &Goals,
        plan: &BucketPlan,
    ) -> AggregateResult {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut expense_by_responsibility: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut party_balances: Vec<PartyBalance> =
            self.rules.parties().map(PartyBalance::new).collect();
        let mut period_buckets: BTreeMap<PeriodKey, PeriodBucket> = plan
            .range
            .period_keys(plan.granularity)
            .into_iter()
            .map(|key| (key, PeriodBucket::default()))
            .collect();
        let mut skipped_records = 0;

        for tx in filtered {
            let amount = tx.amount();
            let total = if tx.is_income() {
                &mut total_income
            } else {
                &mut total_expense
            };
            let Some(next_total) = total.checked_add(amount) else {
                tracing::warn!(id = %tx.id, %amount, "amount overflows running total, skipping record");
                skipped_records += 1;
                continue;
            };
            *total = next_total;
            if tx.is_malformed() {
                skipped_records += 1;
            }

            // Every partial sum is bounded by its grand total.
            if !tx.is_income() {
                let category = expense_by_category
                    .entry(label_or(&tx.category, &self.uncategorized_label))
                    .or_default();
                *category = category.saturating_add(amount);
                let responsibility = expense_by_responsibility
                    .entry(label_or(&tx.responsibility, &self.unassigned_label))
                    .or_default();
                *responsibility = responsibility.saturating_add(amount);
            }

            self.attribute(tx, amount, &mut party_balances);

            if let Some(bucket) = tx
                .calendar_date()
                .filter(|_| plan.range.contains_key(&tx.date))
                .and_then(|date| period_buckets.get_mut(&PeriodKey::for_date(date, plan.granularity)))
            {
                if tx.is_income() {
                    bucket.income = bucket.income.saturating_add(amount);
                } else {
                    bucket.expense = bucket.expense.saturating_add(amount);
                }
            }
        }

        let mut running = Decimal::ZERO;
        for bucket in period_buckets.values_mut() {
            running = running.saturating_add(bucket.income - bucket.expense);
            bucket.net_cumulative = running;
        }

        if skipped_records > 0 {
            tracing::warn!(
                skipped_records,
                total = filtered.len(),
                "aggregated snapshot with malformed records"
            );
        }

        let health_ratio = health_ratio(total_income, total_expense);
        let goal_progress = GoalService::track(goals, &expense_by_category);

        tracing::debug!(
            records = filtered.len(),
            buckets = period_buckets.len(),
            goals = goal_progress.len(),
            "aggregation pass complete"
        );

        AggregateResult {
            total_income,
            total_expense,
            net_balance: total_income - total_expense,
            health_ratio,
            health_level: health_level(health_ratio),
            expense_by_category,
            expense_by_responsibility,
            party_balances,
            granularity: plan.granularity,
            period_buckets,
            goal_progress,
            record_count: filtered.len(),
            skipped_records,
        }
    }

    fn attribute(&self, tx: &Transaction, amount: Decimal, balances: &mut [PartyBalance]) {
        let mut credit = |index: usize, share: Decimal| {
            if let Some(balance) = balances.get_mut(index) {
                if tx.is_income() {
                    balance.entries = balance.entries.saturating_add(share);
                } else {
                    balance.exits = balance.exits.saturating_add(share);
                }
            }
        };

        match self.rules.attribute(&tx.responsibility) {
            Attribution::Shared => {
                let half = amount / Decimal::TWO;
                for index in self.rules.partner_indices() {
                    credit(index, half);
                }
            }
            Attribution::Party(index) => credit(index, amount),
            Attribution::Unattributed => {}
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn label_or(label: &str, fallback: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        fallback.to_string()
    } else {
        label.to_string()
    }
}

/// `expense / income`, tagged as [`HealthRatio::NoIncome`] when income is zero.
///
/// A quotient too large for a `Decimal` saturates at `Decimal::MAX`.
#[must_use]
pub fn health_ratio(income: Decimal, expense: Decimal) -> HealthRatio {
    if income.is_zero() {
        HealthRatio::NoIncome
    } else {
        HealthRatio::Defined(expense.checked_div(income).unwrap_or(Decimal::MAX))
    }
}

/// Band for a health ratio, reading the percentage capped at 100.
#[must_use]
pub fn health_level(ratio: HealthRatio) -> HealthLevel {
    let Some(percent) = ratio.percent() else {
        return HealthLevel::NoIncome;
    };
    let percent = percent.min(Decimal::ONE_HUNDRED);
    if percent > CRITICAL_ABOVE {
        HealthLevel::Critical
    } else if percent > STRAINED_ABOVE {
        HealthLevel::Strained
    } else if percent > ELEVATED_ABOVE {
        HealthLevel::Elevated
    } else {
        HealthLevel::Comfortable
    }
}

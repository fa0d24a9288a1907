//! Shapes an [`AggregateResult`] into dashboard series.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{DashboardView, FlowChart, KpiSummary, PartyBar, Slice};
use crate::aggregate::AggregateResult;

/// Dashboard service.
pub struct DashboardService;

impl DashboardService {
    /// Builds the full dashboard from one aggregation result.
    #[must_use]
    pub fn build(result: &AggregateResult) -> DashboardView {
        DashboardView {
            summary: Self::summary(result),
            flow_chart: Self::flow_chart(result),
            category_slices: Self::slices(&result.expense_by_category),
            responsibility_slices: Self::slices(&result.expense_by_responsibility),
            party_bars: result
                .party_balances
                .iter()
                .map(|balance| PartyBar {
                    party: balance.party.clone(),
                    entries: balance.entries,
                    exits: balance.exits,
                    net: balance.net(),
                })
                .collect(),
            goals: result.goal_progress.clone(),
        }
    }

    /// Headline KPIs.
    #[must_use]
    pub fn summary(result: &AggregateResult) -> KpiSummary {
        KpiSummary {
            total_income: result.total_income,
            total_expense: result.total_expense,
            net_balance: result.net_balance,
            health_ratio: result.health_ratio,
            health_level: result.health_level,
            committed_percent: result
                .health_ratio
                .percent()
                .map(|p| p.min(Decimal::ONE_HUNDRED).round_dp(1)),
            skipped_records: result.skipped_records,
        }
    }

    /// Flow chart series in bucket order.
    #[must_use]
    pub fn flow_chart(result: &AggregateResult) -> FlowChart {
        let mut chart = FlowChart {
            granularity: result.granularity,
            labels: Vec::with_capacity(result.period_buckets.len()),
            income: Vec::with_capacity(result.period_buckets.len()),
            expense: Vec::with_capacity(result.period_buckets.len()),
            net: Vec::with_capacity(result.period_buckets.len()),
            cumulative: Vec::with_capacity(result.period_buckets.len()),
        };
        for (key, bucket) in &result.period_buckets {
            chart.labels.push(key.to_string());
            chart.income.push(bucket.income);
            chart.expense.push(bucket.expense);
            chart.net.push(bucket.income - bucket.expense);
            chart.cumulative.push(bucket.net_cumulative);
        }
        chart
    }

    /// Breakdown slices sorted by amount descending, then label.
    #[must_use]
    pub fn slices(breakdown: &BTreeMap<String, Decimal>) -> Vec<Slice> {
        let total = breakdown
            .values()
            .fold(Decimal::ZERO, |sum, amount| sum.saturating_add(*amount));
        let mut slices: Vec<Slice> = breakdown
            .iter()
            .map(|(label, amount)| Slice {
                label: label.clone(),
                amount: *amount,
                percent: amount
                    .checked_div(total)
                    .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                    .map_or(Decimal::ZERO, |percent| percent.round_dp(2)),
            })
            .collect();
        slices.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.label.cmp(&b.label)));
        slices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::goals::Goals;
    use crate::period::YearMonth;
    use crate::transaction::{Transaction, TransactionType};
    use crate::view::ViewConfig;
    use rust_decimal_macros::dec;

    fn result() -> AggregateResult {
        let txs = vec![
            Transaction::new("i", "2026-01-02", TransactionType::Income, dec!(1000)),
            Transaction::new("a", "2026-01-05", TransactionType::Expense, dec!(300))
                .with_category("rent")
                .with_responsibility("shared"),
            Transaction::new("b", "2026-01-06", TransactionType::Expense, dec!(100))
                .with_category("food")
                .with_responsibility("primary"),
            Transaction::new("c", "2026-01-07", TransactionType::Expense, dec!(100))
                .with_category("fun"),
        ];
        let view = ViewConfig::for_months(YearMonth::new(2026, 1).unwrap(), None).unwrap();
        Aggregator::default().run(&txs, &Goals::new(), &view).1
    }

    #[test]
    fn test_flow_chart_series_line_up() {
        let chart = DashboardService::flow_chart(&result());
        assert_eq!(chart.labels.len(), 31);
        assert_eq!(chart.labels[0], "01");
        assert_eq!(chart.income[1], dec!(1000));
        assert_eq!(chart.net[4], dec!(-300));
        assert_eq!(chart.cumulative[30], dec!(500));
    }

    #[test]
    fn test_slices_sorted_with_shares() {
        let view = DashboardService::build(&result());
        let labels: Vec<&str> = view.category_slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["rent", "food", "fun"]);
        assert_eq!(view.category_slices[0].percent, dec!(60));
        assert_eq!(view.category_slices[1].percent, dec!(20));
    }

    #[test]
    fn test_summary_and_party_bars() {
        let view = DashboardService::build(&result());
        assert_eq!(view.summary.committed_percent, Some(dec!(50.0)));
        assert_eq!(view.party_bars[0].party, "primary");
        assert_eq!(view.party_bars[0].exits, dec!(250));
        assert_eq!(view.party_bars[1].exits, dec!(150));
        assert_eq!(view.party_bars[1].net, dec!(-150));
    }

    #[test]
    fn test_slices_survive_saturated_total() {
        let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let breakdown = BTreeMap::from([("a".to_string(), huge), ("b".to_string(), huge)]);
        let slices = DashboardService::slices(&breakdown);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percent, slices[1].percent);
        assert!(slices[0].percent <= Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_empty_breakdown_has_no_slices() {
        assert!(DashboardService::slices(&BTreeMap::new()).is_empty());
    }
}

//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{HealthLevel, HealthRatio};
use crate::goals::GoalProgress;
use crate::period::Granularity;

/// Everything the dashboard renders, chart-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Headline numbers.
    pub summary: KpiSummary,
    /// Flow chart series.
    pub flow_chart: FlowChart,
    /// Expense per category, largest first.
    pub category_slices: Vec<Slice>,
    /// Expense per responsibility label, largest first.
    pub responsibility_slices: Vec<Slice>,
    /// Entries and exits per party.
    pub party_bars: Vec<PartyBar>,
    /// Goal progress, most at-risk first.
    pub goals: Vec<GoalProgress>,
}

/// Headline KPIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Total income.
    pub total_income: Decimal,
    /// Total expense.
    pub total_expense: Decimal,
    /// Income minus expense.
    pub net_balance: Decimal,
    /// Expense-to-income ratio.
    pub health_ratio: HealthRatio,
    /// Band of the ratio.
    pub health_level: HealthLevel,
    /// Share of income committed, capped at 100, one decimal place.
    pub committed_percent: Option<Decimal>,
    /// Malformed records in the view.
    pub skipped_records: usize,
}

/// Flow chart data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowChart {
    /// Bucket granularity.
    pub granularity: Granularity,
    /// Labels (`"05"` or `"2026-01"`).
    pub labels: Vec<String>,
    /// Income per bucket.
    pub income: Vec<Decimal>,
    /// Expense per bucket.
    pub expense: Vec<Decimal>,
    /// Income minus expense per bucket.
    pub net: Vec<Decimal>,
    /// Running balance per bucket.
    pub cumulative: Vec<Decimal>,
}

/// One slice of a breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Category or label.
    pub label: String,
    /// Amount.
    pub amount: Decimal,
    /// Percentage of the breakdown total.
    pub percent: Decimal,
}

/// Entries and exits of one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyBar {
    /// Party name.
    pub party: String,
    /// Money in.
    pub entries: Decimal,
    /// Money out.
    pub exits: Decimal,
    /// Entries minus exits.
    pub net: Decimal,
}

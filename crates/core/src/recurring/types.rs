//! Recurring template types.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::TransactionType;

/// How often a template repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Same day every month, clamped to shorter months.
    #[default]
    #[serde(alias = "mensal")]
    Monthly,
    /// Every 15 days.
    #[serde(alias = "quinzenal")]
    Biweekly,
    /// Every 7 days.
    #[serde(alias = "semanal")]
    Weekly,
}

/// A saved model that expands into a series of pending transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// Description; occurrences get an ` (i/n)` suffix when `repetitions > 1`.
    pub description: String,
    /// Amount of each occurrence.
    pub value: Decimal,
    /// Category.
    #[serde(default)]
    pub category: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Responsibility label.
    #[serde(default)]
    pub responsibility: String,
    /// Step between occurrences.
    #[serde(default)]
    pub frequency: Frequency,
    /// Number of occurrences; anything below 1 means 1.
    #[serde(default = "default_repetitions")]
    pub repetitions: i32,
}

const fn default_repetitions() -> i32 {
    1
}

impl RecurringTemplate {
    /// Effective number of occurrences.
    #[must_use]
    pub fn occurrences(&self) -> u32 {
        u32::try_from(self.repetitions).unwrap_or(0).max(1)
    }

    /// Date of the zero-based occurrence `index` when the series starts on `start`.
    #[must_use]
    pub fn occurrence_date(&self, start: NaiveDate, index: u32) -> Option<NaiveDate> {
        match self.frequency {
            Frequency::Monthly => start.checked_add_months(Months::new(index)),
            Frequency::Biweekly => start.checked_add_days(Days::new(u64::from(index) * 15)),
            Frequency::Weekly => start.checked_add_days(Days::new(u64::from(index) * 7)),
        }
    }
}

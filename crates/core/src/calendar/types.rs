//! Calendar view types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::YearMonth;
use crate::transaction::Transaction;

/// One day opened in the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetail {
    /// The day.
    pub date: NaiveDate,
    /// Transactions dated that day, realized first.
    pub transactions: Vec<Transaction>,
    /// Income dated that day.
    pub income: Decimal,
    /// Expense dated that day.
    pub expense: Decimal,
    /// Signed total of every loaded transaction dated on or before the day.
    ///
    /// Only the loaded snapshot is summed; history before the loaded window
    /// is not part of this balance.
    pub balance_through: Decimal,
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Day of month.
    pub day: u32,
    /// The date.
    pub date: NaiveDate,
    /// Number of transactions that day.
    pub count: usize,
    /// Income that day.
    pub income: Decimal,
    /// Expense that day.
    pub expense: Decimal,
    /// Running balance from the 1st of the month, seeded at zero.
    pub balance: Decimal,
}

/// A month laid out as a Sunday-first grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    /// The month.
    pub month: YearMonth,
    /// Empty cells before the 1st (Sunday = 0).
    pub leading_blanks: u32,
    /// One cell per day.
    pub days: Vec<CalendarDay>,
}

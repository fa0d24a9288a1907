//! Day and month calendar derivations over the loaded snapshot.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::types::{CalendarDay, DayDetail, MonthView};
use crate::period::YearMonth;
use crate::transaction::Transaction;
use crate::view::{SortSpec, sort_rows};

/// Calendar service.
pub struct CalendarService;

impl CalendarService {
    /// Transactions, subtotals and running balance for one day.
    ///
    /// Records with an unusable date are ignored.
    #[must_use]
    pub fn day_detail(snapshot: &[Transaction], date: NaiveDate) -> DayDetail {
        let mut transactions = Vec::new();
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        let mut balance_through = Decimal::ZERO;

        for tx in snapshot {
            let Some(tx_date) = tx.calendar_date() else {
                continue;
            };
            if tx_date > date {
                continue;
            }
            balance_through = balance_through.saturating_add(tx.signed_amount());
            if tx_date == date {
                if tx.is_income() {
                    income = income.saturating_add(tx.amount());
                } else {
                    expense = expense.saturating_add(tx.amount());
                }
                transactions.push(tx.clone());
            }
        }

        sort_rows(&mut transactions, SortSpec::default());

        DayDetail {
            date,
            transactions,
            income,
            expense,
            balance_through,
        }
    }

    /// The month grid with per-day totals and a running balance.
    #[must_use]
    pub fn month_view(snapshot: &[Transaction], month: YearMonth) -> MonthView {
        let mut per_day: BTreeMap<u32, (usize, Decimal, Decimal)> = BTreeMap::new();
        for tx in snapshot {
            let Some(date) = tx.calendar_date().filter(|d| YearMonth::of(*d) == month) else {
                continue;
            };
            let entry = per_day.entry(date.day()).or_default();
            entry.0 += 1;
            if tx.is_income() {
                entry.1 = entry.1.saturating_add(tx.amount());
            } else {
                entry.2 = entry.2.saturating_add(tx.amount());
            }
        }

        let mut balance = Decimal::ZERO;
        let days = (1..=month.days_in_month())
            .filter_map(|day| month.day(day).map(|date| (day, date)))
            .map(|(day, date)| {
                let (count, income, expense) = per_day.get(&day).copied().unwrap_or_default();
                balance = balance.saturating_add(income.saturating_sub(expense));
                CalendarDay {
                    day,
                    date,
                    count,
                    income,
                    expense,
                    balance,
                }
            })
            .collect();

        MonthView {
            month,
            leading_blanks: month.first_day().weekday().num_days_from_sunday(),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> Vec<Transaction> {
        vec![
            Transaction::new("a", "2026-01-03", TransactionType::Income, dec!(1000)),
            Transaction::new("b", "2026-01-05", TransactionType::Expense, dec!(50)).pending(),
            Transaction::new("c", "2026-01-05", TransactionType::Expense, dec!(30)),
            Transaction::new("d", "2026-01-20", TransactionType::Expense, dec!(400)),
            Transaction::new("e", "bad", TransactionType::Expense, dec!(999)),
        ]
    }

    #[test]
    fn test_day_detail() {
        let detail = CalendarService::day_detail(&snapshot(), date(2026, 1, 5));

        let ids: Vec<&str> = detail.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(detail.income, dec!(0));
        assert_eq!(detail.expense, dec!(80));
        assert_eq!(detail.balance_through, dec!(920));
    }

    #[test]
    fn test_day_detail_only_sees_loaded_snapshot() {
        // Nothing before the 3rd is loaded, so the balance starts there.
        let detail = CalendarService::day_detail(&snapshot(), date(2026, 1, 2));
        assert!(detail.transactions.is_empty());
        assert_eq!(detail.balance_through, dec!(0));
    }

    #[test]
    fn test_month_view() {
        let view = CalendarService::month_view(&snapshot(), YearMonth::new(2026, 1).unwrap());

        // 2026-01-01 is a Thursday.
        assert_eq!(view.leading_blanks, 4);
        assert_eq!(view.days.len(), 31);

        let day5 = &view.days[4];
        assert_eq!(day5.day, 5);
        assert_eq!(day5.count, 2);
        assert_eq!(day5.expense, dec!(80));
        assert_eq!(day5.balance, dec!(920));

        assert_eq!(view.days[1].balance, dec!(0));
        assert_eq!(view.days[30].balance, dec!(520));
    }

    #[test]
    fn test_month_view_ignores_other_months() {
        let view = CalendarService::month_view(&snapshot(), YearMonth::new(2026, 2).unwrap());
        assert_eq!(view.days.len(), 28);
        assert!(view.days.iter().all(|d| d.count == 0 && d.balance.is_zero()));
        // 2026-02-01 is a Sunday.
        assert_eq!(view.leading_blanks, 0);
    }
}

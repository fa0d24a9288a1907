//! Filter/sort stage.
//!
//! Ties after the configured column are broken by status (realized before
//! pending) and then by id, so the output order is total and deterministic.
//! The tie-break does not flip with the sort direction.

use std::cmp::Ordering;

use super::config::{SortColumn, SortDirection, SortSpec, StatusMode, TextFilters, ViewConfig};
use crate::transaction::Transaction;

/// Narrows `transactions` to what `config` selects and orders the result.
#[must_use]
pub fn filter_and_sort(transactions: &[Transaction], config: &ViewConfig) -> Vec<Transaction> {
    let mut rows: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| matches(tx, config))
        .cloned()
        .collect();
    sort_rows(&mut rows, config.sort);
    rows
}

/// True if `tx` passes the range, status and text predicates of `config`.
#[must_use]
pub fn matches(tx: &Transaction, config: &ViewConfig) -> bool {
    if !config.range.contains_key(&tx.date) {
        return false;
    }
    if config.status_mode == StatusMode::RealizedOnly && !tx.status {
        return false;
    }
    matches_text(tx, &config.filters)
}

fn matches_text(tx: &Transaction, filters: &TextFilters) -> bool {
    contains_ci(tx.day_component(), &filters.day)
        && contains_ci(Some(&tx.description), &filters.description)
        && contains_ci(Some(&tx.category), &filters.category)
        && contains_ci(Some(&tx.responsibility), &filters.responsibility)
}

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    field.is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}

/// Sorts rows in place, stable, with the documented tie-break.
pub fn sort_rows(rows: &mut [Transaction], sort: SortSpec) {
    rows.sort_by(|a, b| {
        let primary = compare_column(a, b, sort.column);
        let primary = match sort.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary
            .then_with(|| b.status.cmp(&a.status))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn compare_column(a: &Transaction, b: &Transaction, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Date => a
            .calendar_date()
            .cmp(&b.calendar_date())
            .then_with(|| a.date.cmp(&b.date)),
        SortColumn::Description => compare_ci(&a.description, &b.description),
        SortColumn::Category => compare_ci(&a.category, &b.category),
        SortColumn::Responsibility => compare_ci(&a.responsibility, &b.responsibility),
        SortColumn::Value => a.value.cmp(&b.value),
        SortColumn::Type => a.kind.cmp(&b.kind),
        SortColumn::Status => a.status.cmp(&b.status),
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

//! Canonical transaction types.

use chrono::NaiveDate;
use fluxo_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::parse_iso_date;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in.
    #[serde(alias = "receita")]
    Income,
    /// Money going out.
    #[serde(alias = "despesa")]
    Expense,
}

/// A normalized income or expense record.
///
/// `value` is never negative; the sign comes from `kind`. A `None` value marks
/// a record whose source amount was not numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Document key, unique within its collection.
    pub id: TransactionId,
    /// `YYYY-MM-DD`, zero-padded.
    pub date: String,
    /// Free-text label.
    pub description: String,
    /// Non-negative amount, `None` if the source value was not numeric.
    pub value: Option<Decimal>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Grouping label, mostly used for expenses.
    pub category: String,
    /// Party or parties the transaction is attributed to.
    pub responsibility: String,
    /// Realized (`true`) or pending (`false`).
    pub status: bool,
}

impl Transaction {
    /// Creates a realized transaction with empty labels.
    #[must_use]
    pub fn new(
        id: impl Into<TransactionId>,
        date: impl Into<String>,
        kind: TransactionType,
        value: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            description: String::new(),
            value: Some(value.abs()),
            kind,
            category: String::new(),
            responsibility: String::new(),
            status: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the responsibility label.
    #[must_use]
    pub fn with_responsibility(mut self, responsibility: impl Into<String>) -> Self {
        self.responsibility = responsibility.into();
        self
    }

    /// Marks the transaction as pending.
    #[must_use]
    pub const fn pending(mut self) -> Self {
        self.status = false;
        self
    }

    /// True for income.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Amount with a missing value counted as zero.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }

    /// `+value` for income, `-value` for expenses.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount(),
            TransactionType::Expense => -self.amount(),
        }
    }

    /// Parsed date, `None` if the stored date is malformed.
    #[must_use]
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    /// The `DD` component of the stored date, if it has one.
    #[must_use]
    pub fn day_component(&self) -> Option<&str> {
        self.date.splitn(3, '-').nth(2)
    }

    /// True if the record cannot be fully aggregated.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.value.is_none() || self.calendar_date().is_none()
    }
}

//! Ingestion boundary: raw documents to canonical transactions.
//!
//! Stored documents carry several spellings of the same thing (`"receita"`,
//! `"ENTRADA"`, `true`, `"Pago"`, amounts as numbers or strings). They are all
//! resolved here so nothing downstream branches on spellings.

use std::str::FromStr;

use chrono::NaiveDate;
use fluxo_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::types::{Transaction, TransactionType};
use crate::period::parse_iso_date;

/// A transaction document as delivered by the store, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    /// Document key; a fresh one is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Date in any accepted spelling.
    #[serde(default)]
    pub date: Option<String>,
    /// Free-text label.
    #[serde(default)]
    pub description: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    pub value: Value,
    /// Direction in any accepted spelling.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Grouping label.
    #[serde(default)]
    pub category: Option<String>,
    /// Attribution label.
    #[serde(default)]
    pub responsibility: Option<String>,
    /// Boolean or status word.
    #[serde(default)]
    pub status: Value,
}

/// Normalizes one raw document.
#[must_use]
pub fn normalize(raw: RawTransaction) -> Transaction {
    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .map_or_else(TransactionId::generate, TransactionId::from);

    Transaction {
        id,
        date: normalize_date(raw.date.as_deref().unwrap_or_default()),
        description: raw.description.unwrap_or_default(),
        value: parse_amount(&raw.value),
        kind: parse_kind(raw.kind.as_deref().unwrap_or_default()),
        category: raw.category.unwrap_or_default().trim().to_string(),
        responsibility: raw.responsibility.unwrap_or_default().trim().to_string(),
        status: parse_status(&raw.status),
    }
}

/// Normalizes a whole snapshot, logging how many records are malformed.
#[must_use]
pub fn normalize_snapshot(docs: Vec<RawTransaction>) -> Vec<Transaction> {
    let transactions: Vec<Transaction> = docs.into_iter().map(normalize).collect();
    let malformed = transactions.iter().filter(|t| t.is_malformed()).count();
    if malformed > 0 {
        tracing::warn!(malformed, total = transactions.len(), "snapshot contains malformed records");
    }
    transactions
}

/// Parses a JSON array of transaction documents.
///
/// # Errors
///
/// Returns an error if `json` is not an array of objects.
pub fn from_json_documents(json: &str) -> Result<Vec<Transaction>, serde_json::Error> {
    let docs: Vec<RawTransaction> = serde_json::from_str(json)?;
    Ok(normalize_snapshot(docs))
}

/// Resolves a direction label. Anything not recognized as income is an expense.
#[must_use]
pub fn parse_kind(label: &str) -> TransactionType {
    let label = label.trim().to_lowercase();
    if label == "receita" || label == "income" || label.contains("entrada") {
        TransactionType::Income
    } else {
        TransactionType::Expense
    }
}

/// Resolves a status value: `true` or a settled status word means realized.
#[must_use]
pub fn parse_status(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(label) => parse_status_label(label),
        _ => false,
    }
}

/// Resolves a textual status.
#[must_use]
pub fn parse_status_label(label: &str) -> bool {
    matches!(
        label.trim().to_lowercase().as_str(),
        "true" | "pago" | "paid" | "realized"
    )
}

/// Resolves an amount to a non-negative decimal, `None` if not numeric.
#[must_use]
pub fn parse_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_amount_text(&number.to_string()),
        Value::String(text) => parse_amount_text(text),
        _ => None,
    }
}

/// Parses `"12.50"`, `"12,50"`, `"1.234,56"`, `"1,234.56"` or `"1e3"` into a non-negative decimal.
#[must_use]
pub fn parse_amount_text(text: &str) -> Option<Decimal> {
    parse_signed_amount_text(text).map(|amount| amount.abs())
}

/// Like [`parse_amount_text`] but keeps the sign.
#[must_use]
pub fn parse_signed_amount_text(text: &str) -> Option<Decimal> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    // With both separators present, the last one marks the decimals.
    let canonical = match (compact.rfind('.'), compact.rfind(',')) {
        (Some(dot), Some(comma)) if dot > comma => compact.replace(',', ""),
        (Some(_), Some(_)) => compact.replace('.', "").replace(',', "."),
        (None, Some(_)) => compact.replace(',', "."),
        _ => compact,
    };

    Decimal::from_str(&canonical)
        .or_else(|_| Decimal::from_scientific(&canonical))
        .ok()
}

/// Brings a date into zero-padded ISO form when it can be understood.
///
/// Accepts ISO (padded or not), ISO date-times and `dd/mm/yyyy`. Anything else
/// is returned trimmed and unchanged, and later treated as malformed.
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if parse_iso_date(trimmed).is_some() {
        return trimmed.to_string();
    }

    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
    let parsed = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"));

    match parsed {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

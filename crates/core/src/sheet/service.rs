//! CSV import and export of spreadsheet rows.

use std::io::{Read, Write};
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use fluxo_shared::types::TransactionId;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::SheetError;
use super::types::{SheetImport, SheetRow};
use crate::transaction::normalize::{
    normalize_date, parse_amount_text, parse_kind, parse_status_label,
};
use crate::transaction::Transaction;

const DEFAULT_LABEL: &str = "Geral";
const INCOME_LABEL: &str = "ENTRADA";
const EXPENSE_LABEL: &str = "SAÍDA";
const PAID_LABEL: &str = "Pago";
const PENDING_LABEL: &str = "Pendente";

/// Spreadsheet service.
pub struct SheetService;

impl SheetService {
    /// Imports rows from CSV with a header line.
    ///
    /// Rows without a description or a non-zero numeric value are skipped.
    /// Rows without a date are dated `today`.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::Csv` if the CSV itself cannot be read.
    pub fn import<R: Read>(reader: R, today: NaiveDate) -> Result<SheetImport, SheetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut transactions = Vec::new();
        let mut skipped_rows = 0;

        for result in csv_reader.deserialize::<SheetRow>() {
            let row = result?;
            match Self::row_to_transaction(&row, today) {
                Some(tx) => transactions.push(tx),
                None => skipped_rows += 1,
            }
        }

        tracing::debug!(
            imported = transactions.len(),
            skipped_rows,
            "imported spreadsheet rows"
        );

        Ok(SheetImport {
            transactions,
            skipped_rows,
        })
    }

    /// Converts one row, `None` if it lacks a description or value.
    #[must_use]
    pub fn row_to_transaction(row: &SheetRow, today: NaiveDate) -> Option<Transaction> {
        let description = row.description.trim();
        if description.is_empty() {
            return None;
        }
        let value = parse_amount_text(&row.value).filter(|v| !v.is_zero())?;

        let mut tx = Transaction::new(
            TransactionId::generate(),
            Self::parse_sheet_date(&row.date, today),
            parse_kind(&row.kind),
            value,
        )
        .with_description(description)
        .with_category(or_default(&row.category))
        .with_responsibility(or_default(&row.responsibility));
        tx.status = parse_status_label(&row.status);
        Some(tx)
    }

    /// Resolves a `Data` cell to an ISO date string.
    ///
    /// Blank cells become `today`; bare numbers are spreadsheet serial days
    /// counted from 1899-12-30. Anything unparsable is kept as written.
    #[must_use]
    pub fn parse_sheet_date(raw: &str, today: NaiveDate) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return today.format("%Y-%m-%d").to_string();
        }
        if let Some(date) = serial_date(raw) {
            return date.format("%Y-%m-%d").to_string();
        }
        normalize_date(raw)
    }

    /// Writes transactions as CSV rows with a header line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn export<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), SheetError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for tx in transactions {
            csv_writer.serialize(Self::transaction_to_row(tx))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes a header plus one example row showing the expected layout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn export_template<W: Write>(writer: W) -> Result<(), SheetError> {
        let example = SheetRow {
            date: "01/01/2026".into(),
            description: "Exemplo".into(),
            category: DEFAULT_LABEL.into(),
            value: "-50.00".into(),
            kind: EXPENSE_LABEL.into(),
            responsibility: "EU".into(),
            status: PAID_LABEL.into(),
        };
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.serialize(example)?;
        csv_writer.flush()?;
        Ok(())
    }

    /// The row a transaction exports as.
    #[must_use]
    pub fn transaction_to_row(tx: &Transaction) -> SheetRow {
        SheetRow {
            date: tx
                .calendar_date()
                .map_or_else(|| tx.date.clone(), |d| d.format("%d/%m/%Y").to_string()),
            description: tx.description.clone(),
            category: tx.category.clone(),
            value: tx.value.map(|v| v.to_string()).unwrap_or_default(),
            kind: if tx.is_income() { INCOME_LABEL } else { EXPENSE_LABEL }.into(),
            responsibility: tx.responsibility.clone(),
            status: if tx.status { PAID_LABEL } else { PENDING_LABEL }.into(),
        }
    }
}

fn or_default(label: &str) -> &str {
    let label = label.trim();
    if label.is_empty() { DEFAULT_LABEL } else { label }
}

fn serial_date(raw: &str) -> Option<NaiveDate> {
    if !raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let serial = Decimal::from_str(raw).ok()?;
    let days = serial
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}

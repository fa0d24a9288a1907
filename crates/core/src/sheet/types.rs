//! Spreadsheet row shape.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// One spreadsheet row, every cell as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// `dd/mm/yyyy`, ISO, or a spreadsheet serial day number.
    #[serde(rename = "Data", default)]
    pub date: String,
    /// Description.
    #[serde(rename = "Descrição", alias = "Descricao", default)]
    pub description: String,
    /// Category.
    #[serde(rename = "Categoria", default)]
    pub category: String,
    /// Amount; the sign is ignored on import.
    #[serde(rename = "Valor", default)]
    pub value: String,
    /// `ENTRADA` or `SAÍDA`.
    #[serde(rename = "Tipo", default)]
    pub kind: String,
    /// Responsibility label.
    #[serde(rename = "Responsabilidade", default)]
    pub responsibility: String,
    /// `Pago` or `Pendente`.
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// Outcome of importing a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetImport {
    /// Rows turned into transactions.
    pub transactions: Vec<Transaction>,
    /// Rows without a description or a usable value.
    pub skipped_rows: usize,
}

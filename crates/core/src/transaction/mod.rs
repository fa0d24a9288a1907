//! Transactions and their normalization at the ingestion boundary.

pub mod normalize;
pub mod types;

pub use normalize::{RawTransaction, from_json_documents, normalize_snapshot};
pub use types::{Transaction, TransactionType};

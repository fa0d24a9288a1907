//! Spreadsheet row import and export.

pub mod error;
pub mod service;
pub mod types;

pub use error::SheetError;
pub use service::SheetService;
pub use types::{SheetImport, SheetRow};

//! Recurring transaction templates.

pub mod service;
pub mod types;

pub use service::RecurringService;
pub use types::{Frequency, RecurringTemplate};

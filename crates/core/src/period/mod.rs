//! Calendar months, date ranges and bucket keys.

pub mod error;
pub mod range;

pub use error::PeriodError;
pub use range::{DateRange, Granularity, PeriodKey, YearMonth, parse_iso_date};

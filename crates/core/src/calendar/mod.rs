//! Calendar month grid and day detail.

pub mod service;
pub mod types;

pub use service::CalendarService;
pub use types::{CalendarDay, DayDetail, MonthView};

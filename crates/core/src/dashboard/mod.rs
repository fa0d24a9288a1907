//! Dashboard chart shaping.
//!
//! A thin consumer of aggregation results:
//! - Headline KPIs and health band
//! - Flow series, breakdown slices and party bars

pub mod service;
pub mod types;

pub use service::DashboardService;
pub use types::*;

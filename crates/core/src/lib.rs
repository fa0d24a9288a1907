//! Core engine for Fluxo.
//!
//! This crate contains the pure aggregation pipeline with ZERO UI or database
//! dependencies. Raw records are normalized at the boundary, filtered and
//! sorted for a view, then folded into render-ready totals.
//!
//! # Modules
//!
//! - `transaction` - Canonical transaction record and ingestion normalization
//! - `period` - Date ranges, month keys and bucket granularity
//! - `view` - View configuration and the filter/sort stage
//! - `aggregate` - KPIs, period buckets, breakdowns and party balances
//! - `goals` - Category spending limits and progress tiers
//! - `calendar` - Day detail and month grid
//! - `dashboard` - Chart-ready series derived from an aggregate
//! - `recurring` - Expansion of recurring templates into pending entries
//! - `sheet` - Spreadsheet CSV import and export
//! - `feed` - Live snapshot subscription and the always-current view

pub mod aggregate;
pub mod calendar;
pub mod dashboard;
pub mod feed;
pub mod goals;
pub mod period;
pub mod recurring;
pub mod sheet;
pub mod transaction;
pub mod view;

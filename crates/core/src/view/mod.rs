//! View configuration and the filter/sort stage.

pub mod config;
pub mod error;
pub mod filter;

pub use config::{SortColumn, SortDirection, SortSpec, StatusMode, TextFilters, ViewConfig};
pub use error::ViewError;
pub use filter::{filter_and_sort, matches, sort_rows};

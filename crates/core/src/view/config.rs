//! Per-render view configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ViewError;
use crate::period::{DateRange, Granularity, PeriodError, YearMonth};

/// Which transactions a view counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMode {
    /// Only realized transactions.
    #[default]
    RealizedOnly,
    /// Realized and pending transactions (forecast).
    All,
}

impl FromStr for StatusMode {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "realized" | "realized-only" | "realized_only" => Ok(Self::RealizedOnly),
            "all" | "forecast" => Ok(Self::All),
            _ => Err(ViewError::UnknownStatusMode(s.to_string())),
        }
    }
}

/// Case-insensitive substring filters. Blank filters are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFilters {
    /// Matched against the `DD` part of the date.
    pub day: String,
    /// Matched against the description.
    pub description: String,
    /// Matched against the category.
    pub category: String,
    /// Matched against the responsibility label.
    pub responsibility: String,
}

impl TextFilters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the day filter.
    #[must_use]
    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.day = day.into();
        self
    }

    /// Sets the description filter.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category filter.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the responsibility filter.
    #[must_use]
    pub fn with_responsibility(mut self, responsibility: impl Into<String>) -> Self {
        self.responsibility = responsibility.into();
        self
    }

    /// Returns true if no filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.day, &self.description, &self.category, &self.responsibility]
            .iter()
            .all(|f| f.trim().is_empty())
    }
}

/// Column a table view is sorted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Calendar date.
    #[default]
    Date,
    /// Description, case-insensitive.
    Description,
    /// Category, case-insensitive.
    Category,
    /// Responsibility, case-insensitive.
    Responsibility,
    /// Amount.
    Value,
    /// Income before expense.
    Type,
    /// Pending before realized.
    Status,
}

impl FromStr for SortColumn {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "data" => Ok(Self::Date),
            "description" | "descricao" => Ok(Self::Description),
            "category" | "categoria" => Ok(Self::Category),
            "responsibility" | "responsabilidade" => Ok(Self::Responsibility),
            "value" | "valor" => Ok(Self::Value),
            "type" | "tipo" => Ok(Self::Type),
            "status" => Ok(Self::Status),
            _ => Err(ViewError::UnknownSortColumn(s.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Responsibility => "responsibility",
            Self::Value => "value",
            Self::Type => "type",
            Self::Status => "status",
        };
        f.write_str(name)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Sort column and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort on.
    pub column: SortColumn,
    /// Direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `column`.
    #[must_use]
    pub const fn ascending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on `column`.
    #[must_use]
    pub const fn descending(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Everything one render needs to narrow, order and bucket a snapshot.
///
/// Built per render and replaced whole; never mutated behind a reader's back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Inclusive date range.
    pub range: DateRange,
    /// Realized-only or forecast.
    pub status_mode: StatusMode,
    /// Text filters, AND-combined.
    pub filters: TextFilters,
    /// Table ordering.
    pub sort: SortSpec,
    /// Bucket granularity, derived from the range.
    pub granularity: Granularity,
}

impl ViewConfig {
    /// Realized-only view of `range`, sorted by date, with no text filters.
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        let granularity = range.granularity();
        Self {
            range,
            status_mode: StatusMode::default(),
            filters: TextFilters::default(),
            sort: SortSpec::default(),
            granularity,
        }
    }

    /// View covering whole months from `start` through `end`.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidRange` if `end` precedes `start`.
    pub fn for_months(start: YearMonth, end: Option<YearMonth>) -> Result<Self, PeriodError> {
        DateRange::for_months(start, end).map(Self::new)
    }

    /// Replaces the range and re-derives the granularity.
    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.granularity = range.granularity();
        self.range = range;
        self
    }

    /// Sets the status mode.
    #[must_use]
    pub const fn with_status_mode(mut self, status_mode: StatusMode) -> Self {
        self.status_mode = status_mode;
        self
    }

    /// Sets the text filters.
    #[must_use]
    pub fn with_filters(mut self, filters: TextFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the sort.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_follows_range() {
        let jan = YearMonth::new(2026, 1).unwrap();
        let mar = YearMonth::new(2026, 3).unwrap();

        let single = ViewConfig::for_months(jan, None).unwrap();
        assert_eq!(single.granularity, Granularity::Daily);

        let multi = single.with_range(DateRange::for_months(jan, Some(mar)).unwrap());
        assert_eq!(multi.granularity, Granularity::Monthly);
    }

    #[test]
    fn test_blank_filters_are_inactive() {
        assert!(TextFilters::new().is_empty());
        assert!(TextFilters::new().with_category("   ").is_empty());
        assert!(!TextFilters::new().with_category("foo").is_empty());
    }

    #[test]
    fn test_parse_sort_column_and_mode() {
        assert_eq!("Valor".parse::<SortColumn>().unwrap(), SortColumn::Value);
        assert_eq!("date".parse::<SortColumn>().unwrap(), SortColumn::Date);
        assert!("colour".parse::<SortColumn>().is_err());
        assert_eq!("all".parse::<StatusMode>().unwrap(), StatusMode::All);
        assert_eq!(
            "realized".parse::<StatusMode>().unwrap(),
            StatusMode::RealizedOnly
        );
        assert!("maybe".parse::<StatusMode>().is_err());
    }
}

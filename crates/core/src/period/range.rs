//! Month, range and bucket-key types.
//!
//! Stored transaction dates are zero-padded ISO strings, so a range keeps its
//! bounds both as `NaiveDate` and as the matching `YYYY-MM-DD` keys. Range
//! membership is then a plain string comparison.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use super::error::PeriodError;

/// Parses a strictly formatted, zero-padded `YYYY-MM-DD` date.
///
/// Returns `None` for anything else, including unpadded ISO dates.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// A calendar month.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Creates a month, returning `None` for an out-of-range month number.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Month number (1-12).
    #[must_use]
    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    /// The following month, if representable.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Returns the date of `day` within this month.
    #[must_use]
    pub fn day(self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Every month from `self` through `end`, inclusive.
    #[must_use]
    pub fn through(self, end: Self) -> Vec<Self> {
        let mut months = Vec::new();
        let mut current = Some(self);
        while let Some(month) = current {
            if month > end {
                break;
            }
            months.push(month);
            current = month.next();
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

/// How a range is bucketed for flow and trend views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per day of month; used when the range sits in one month.
    Daily,
    /// One bucket per `YYYY-MM`; used when the range spans several months.
    Monthly,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    start_key: String,
    end_key: String,
}

impl DateRange {
    /// Creates an inclusive range.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            end,
            start_key: start.format("%Y-%m-%d").to_string(),
            end_key: end.format("%Y-%m-%d").to_string(),
        })
    }

    /// Range covering whole months from `start` through `end` (or just `start`).
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidRange` if the end month precedes the start month.
    pub fn for_months(start: YearMonth, end: Option<YearMonth>) -> Result<Self, PeriodError> {
        let end = end.unwrap_or(start);
        Self::new(start.first_day(), end.last_day())
    }

    /// Range covering one month.
    #[must_use]
    pub fn month(month: YearMonth) -> Self {
        let start = month.first_day();
        let end = month.last_day();
        Self {
            start,
            end,
            start_key: start.format("%Y-%m-%d").to_string(),
            end_key: end.format("%Y-%m-%d").to_string(),
        }
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start as `YYYY-MM-DD`.
    #[must_use]
    pub fn start_key(&self) -> &str {
        &self.start_key
    }

    /// End as `YYYY-MM-DD`.
    #[must_use]
    pub fn end_key(&self) -> &str {
        &self.end_key
    }

    /// True when `date_key` lies inside the range, compared as strings.
    #[must_use]
    pub fn contains_key(&self, date_key: &str) -> bool {
        self.start_key.as_str() <= date_key && date_key <= self.end_key.as_str()
    }

    /// Granularity implied by the range: daily within one month, monthly otherwise.
    #[must_use]
    pub fn granularity(&self) -> Granularity {
        if YearMonth::of(self.start) == YearMonth::of(self.end) {
            Granularity::Daily
        } else {
            Granularity::Monthly
        }
    }

    /// Every bucket key the range covers at `granularity`, in order.
    #[must_use]
    pub fn period_keys(&self, granularity: Granularity) -> Vec<PeriodKey> {
        match granularity {
            Granularity::Daily => {
                let days: BTreeSet<u32> = self
                    .start
                    .iter_days()
                    .take_while(|d| *d <= self.end)
                    .map(|d| d.day())
                    .collect();
                days.into_iter().map(PeriodKey::Day).collect()
            }
            Granularity::Monthly => YearMonth::of(self.start)
                .through(YearMonth::of(self.end))
                .into_iter()
                .map(PeriodKey::Month)
                .collect(),
        }
    }
}

/// Key of a time bucket: a day of month or a calendar month.
///
/// Displays as `"05"` or `"2026-01"`, so string order matches bucket order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum PeriodKey {
    /// Day of month (1-31).
    Day(u32),
    /// Calendar month.
    Month(YearMonth),
}

impl PeriodKey {
    /// Bucket key for `date` at `granularity`.
    #[must_use]
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => Self::Day(date.day()),
            Granularity::Monthly => Self::Month(YearMonth::of(date)),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{day:02}"),
            Self::Month(month) => write!(f, "{month}"),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 2 {
            return match s.parse::<u32>() {
                Ok(day @ 1..=31) => Ok(Self::Day(day)),
                _ => Err(PeriodError::InvalidKey(s.to_string())),
            };
        }
        s.parse::<YearMonth>()
            .map(Self::Month)
            .map_err(|_| PeriodError::InvalidKey(s.to_string()))
    }
}

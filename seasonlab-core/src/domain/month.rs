//! Calendar month — the index unit of every monthly series.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar month, stored as its first day.
///
/// Serialized as `YYYY-MM`. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month '{0}' (expected YYYY-MM)")]
pub struct MonthParseError(pub String);

impl Month {
    /// Month for a (year, month) pair; `None` if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    /// The UTC calendar month containing `timestamp`.
    pub fn of_timestamp(timestamp: &DateTime<Utc>) -> Self {
        Self::of(timestamp.date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day. Monthly points are labelled with this date.
    pub fn last_day(&self) -> NaiveDate {
        self.plus(1).0 - Days::new(1)
    }

    /// The month `n` months later.
    pub fn plus(&self, n: u32) -> Self {
        Self(self.0 + Months::new(n))
    }

    /// Months elapsed since year 0, used for gap arithmetic.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year()) * 12 + i64::from(self.0.month0())
    }

    /// Signed number of months from `self` to `later`.
    pub fn months_until(&self, later: &Month) -> i64 {
        later.ordinal() - self.ordinal()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Month::new(year, month).ok_or_else(err)
    }
}

impl TryFrom<String> for Month {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

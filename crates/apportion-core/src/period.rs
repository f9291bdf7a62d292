//! # Billing Period
//!
//! A calendar month identified by `(year, month)`. Every supplier invoice,
//! meter reading, and allocation result is scoped to exactly one period.
//!
//! Construction is validated: month must be in 1..=12 and year in
//! 1..=9999. Deserialization goes through the same check, so a
//! `BillingPeriod` value is always well-formed.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A validated billing month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for BillingPeriod {
    type Error = CoreError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month)
    }
}

impl BillingPeriod {
    /// Create a period, rejecting out-of-range components.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=9999).contains(&year) {
            return Err(CoreError::InvalidPeriod(format!(
                "year {year} is outside 1..=9999"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidPeriod(format!(
                "month {month} is outside 1..=12"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    ///
    /// # Errors
    ///
    /// `CoreError::InvalidPeriod` for dates outside years 1..=9999.
    pub fn containing(date: NaiveDate) -> Result<Self, CoreError> {
        Self::new(date.year(), date.month())
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// `YYYY-MM` label, e.g. `2024-03`.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// The month before this one, stepping back across year boundaries.
    /// `None` before 0001-01.
    pub fn previous(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12).ok()
        } else {
            Self::new(self.year, self.month - 1).ok()
        }
    }

    /// The month after this one, stepping forward across year boundaries.
    /// `None` after 9999-12.
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1).ok()
        } else {
            Self::new(self.year, self.month + 1).ok()
        }
    }

    /// First calendar day of the period.
    pub fn first_day(&self) -> NaiveDate {
        // Every year in 1..=9999 is inside chrono's range.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Last calendar day of the period.
    pub fn last_day(&self) -> NaiveDate {
        let last = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year, 12, 31)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).and_then(|d| d.pred_opt())
        };
        last.unwrap_or_else(|| self.first_day())
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for BillingPeriod {
    type Err = CoreError;

    /// Parse a `YYYY-MM` label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidPeriod(format!("expected YYYY-MM, got {s:?}")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| CoreError::InvalidPeriod(format!("invalid year in {s:?}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| CoreError::InvalidPeriod(format!("invalid month in {s:?}")))?;
        Self::new(year, month)
    }
}

//! Period key model.
//!
//! A period is a `(year, month)` pair. [`PeriodKey`] encodes it as `year * 100 + month`,
//! which orders exactly like the calendar and survives a round trip through JSON as a
//! plain integer.

use crate::error::{DashboardSeriesError, Result};
use crate::utils::{next_month, prev_month, validate_month, validate_year};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns `year * 100 + month`. Years outside 1..=9999 are rejected.
pub fn to_key(year: i32, month: u32) -> Result<i32> {
    validate_month(month)?;
    validate_year(year)?;
    Ok(year * 100 + month as i32)
}

/// Three-letter English abbreviation for a 1-based month.
pub fn month_name(month: u32) -> Result<&'static str> {
    validate_month(month)?;
    Ok(MONTH_NAMES[(month - 1) as usize])
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct PeriodKey(i32);

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        Ok(Self(to_key(year, month)?))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        // chrono months are always 1..=12
        Self(date.year() * 100 + date.month() as i32)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.div_euclid(100)
    }

    pub fn month(self) -> u32 {
        self.0.rem_euclid(100) as u32
    }

    pub fn next(self) -> Self {
        let (year, month) = next_month(self.year(), self.month());
        Self(year * 100 + month as i32)
    }

    pub fn prev(self) -> Self {
        let (year, month) = prev_month(self.year(), self.month());
        Self(year * 100 + month as i32)
    }

    /// Human-readable label, e.g. `"Jan 2024"`.
    pub fn label(self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month() - 1) as usize], self.year())
    }
}

impl TryFrom<i32> for PeriodKey {
    type Error = DashboardSeriesError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value.div_euclid(100), value.rem_euclid(100) as u32)
    }
}

impl From<PeriodKey> for i32 {
    fn from(key: PeriodKey) -> Self {
        key.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Parses `"YYYY-MM"`.
impl FromStr for PeriodKey {
    type Err = DashboardSeriesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year, month) = s.split_once('-').ok_or_else(|| {
            DashboardSeriesError::InvalidPeriod(format!("{}. Expected YYYY-MM", s))
        })?;

        let year: i32 = year.parse().map_err(|_| {
            DashboardSeriesError::InvalidPeriod(format!("Invalid year in period: {}", s))
        })?;
        let month: u32 = month.parse().map_err(|_| {
            DashboardSeriesError::InvalidPeriod(format!("Invalid month in period: {}", s))
        })?;

        Self::new(year, month)
    }
}

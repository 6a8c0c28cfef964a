//! Filter predicate builder.
//!
//! Turns a [`FilterSelection`] into a [`RecordFilter`]. Relative selections (current
//! month, last N months) are resolved against the periods that actually occur in the
//! dataset, so a lookback never invents a month the backend did not send.

use crate::error::{DashboardSeriesError, Result};
use crate::period::PeriodKey;
use crate::schema::{BusinessUnitFilter, FilterSelection, PeriodFilter, Record};
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeSet;

pub const ALLOWED_LOOKBACKS: [u32; 3] = [3, 6, 12];

/// Distinct periods present in `records`. Records with an invalid month are skipped.
pub fn available_periods(records: &[Record]) -> BTreeSet<PeriodKey> {
    records.iter().filter_map(|r| r.period_key().ok()).collect()
}

/// Walks back from `current` (inclusive) `months` times, keeping only periods in
/// `available`. Most recent first.
pub fn lookback_periods(
    current: PeriodKey,
    months: u32,
    available: &BTreeSet<PeriodKey>,
) -> Vec<PeriodKey> {
    let mut periods = Vec::new();
    let mut cursor = current;

    for _ in 0..months {
        if available.contains(&cursor) {
            periods.push(cursor);
        }
        cursor = cursor.prev();
    }

    periods
}

#[derive(Debug, Clone, PartialEq)]
enum PeriodMatcher {
    Nothing,
    Everything,
    Periods(BTreeSet<PeriodKey>),
    Range {
        start: Option<PeriodKey>,
        end: Option<PeriodKey>,
    },
    Year(i32),
}

impl PeriodMatcher {
    fn matches(&self, key: PeriodKey) -> bool {
        match self {
            Self::Nothing => false,
            Self::Everything => true,
            Self::Periods(periods) => periods.contains(&key),
            Self::Range { start, end } => {
                start.map_or(true, |s| key >= s) && end.map_or(true, |e| key <= e)
            }
            Self::Year(year) => key.year() == *year,
        }
    }
}

/// Predicate over [`Record`]s built from one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    business_unit: BusinessUnitFilter,
    periods: PeriodMatcher,
}

impl RecordFilter {
    pub fn build(
        selection: &FilterSelection,
        today: NaiveDate,
        available: &BTreeSet<PeriodKey>,
    ) -> Result<Self> {
        let current = PeriodKey::from_date(today);

        let periods = match &selection.period {
            PeriodFilter::All if available.is_empty() => PeriodMatcher::Nothing,
            PeriodFilter::All => PeriodMatcher::Everything,
            PeriodFilter::Year { year } => PeriodMatcher::Year(*year),
            PeriodFilter::CurrentMonth => {
                PeriodMatcher::Periods(lookback_periods(current, 1, available).into_iter().collect())
            }
            PeriodFilter::LastNMonths { months } => {
                if !ALLOWED_LOOKBACKS.contains(months) {
                    return Err(DashboardSeriesError::InvalidLookback(*months));
                }
                let periods = lookback_periods(current, *months, available);
                debug!(
                    "Last {} months from {} resolved to {} available period(s)",
                    months,
                    current,
                    periods.len()
                );
                PeriodMatcher::Periods(periods.into_iter().collect())
            }
            PeriodFilter::CustomRange { start, end } => {
                if let (Some(s), Some(e)) = (start, end) {
                    if s > e {
                        debug!("Custom range {}..={} is inverted and matches nothing", s, e);
                    }
                }
                PeriodMatcher::Range {
                    start: *start,
                    end: *end,
                }
            }
            PeriodFilter::CustomSpecific { year, month } => {
                let key = PeriodKey::new(*year, *month)?;
                PeriodMatcher::Range {
                    start: Some(key),
                    end: Some(key),
                }
            }
        };

        Ok(Self {
            business_unit: selection.business_unit.clone(),
            periods,
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        if !self.business_unit.matches(&record.business_unit_id) {
            return false;
        }
        match record.period_key() {
            Ok(key) => self.periods.matches(key),
            Err(_) => false,
        }
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn as_predicate(&self) -> impl Fn(&Record) -> bool + '_ {
        move |record| self.matches(record)
    }
}

use crate::error::Result;
use crate::period::PeriodKey;
use crate::schema::{AggregationMode, Record};
use crate::utils::percentage_of;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Totals for one period (and business unit, when not summing across units).
///
/// `difference` and `percentage` are derived from `target` and `actual` every time
/// either changes, so they cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    period_key: PeriodKey,
    year: i32,
    month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_unit_id: Option<String>,
    target: f64,
    actual: f64,
    difference: f64,
    percentage: f64,
    amount: f64,
    count: usize,
}

impl AggregateRow {
    pub fn new(period_key: PeriodKey, business_unit_id: Option<String>) -> Self {
        Self {
            period_key,
            year: period_key.year(),
            month: period_key.month(),
            business_unit_id,
            target: 0.0,
            actual: 0.0,
            difference: 0.0,
            percentage: 0.0,
            amount: 0.0,
            count: 0,
        }
    }

    pub fn with_totals(
        period_key: PeriodKey,
        business_unit_id: Option<String>,
        target: f64,
        actual: f64,
    ) -> Self {
        let mut row = Self::new(period_key, business_unit_id);
        row.target = target;
        row.actual = actual;
        row.refresh_derived();
        row
    }

    fn add_record(&mut self, record: &Record) {
        self.target += record.target_or_zero();
        self.actual += record.actual_or_zero();
        self.amount += record.amount_or_zero();
        self.count += 1;
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        self.difference = self.actual - self.target;
        self.percentage = percentage_of(self.actual, self.target, 2);
    }

    pub fn period_key(&self) -> PeriodKey {
        self.period_key
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn business_unit_id(&self) -> Option<&str> {
        self.business_unit_id.as_deref()
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn actual(&self) -> f64 {
        self.actual
    }

    pub fn difference(&self) -> f64 {
        self.difference
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Groups records by period, and by business unit in [`AggregationMode::PerBusinessUnit`].
///
/// The output order is unspecified; call [`sort_by_period`] before presenting it.
pub fn aggregate<'a, I>(records: I, mode: AggregationMode) -> Result<Vec<AggregateRow>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: HashMap<(PeriodKey, Option<String>), AggregateRow> = HashMap::new();
    let mut seen = 0usize;

    for record in records {
        let key = record.period_key()?;
        let unit = match mode {
            AggregationMode::PerBusinessUnit => Some(record.business_unit_id.clone()),
            AggregationMode::AllUnitsSummed => None,
        };

        groups
            .entry((key, unit.clone()))
            .or_insert_with(|| AggregateRow::new(key, unit))
            .add_record(record);
        seen += 1;
    }

    debug!(
        "Aggregated {} record(s) into {} group(s) ({:?})",
        seen,
        groups.len(),
        mode
    );

    Ok(groups.into_values().collect())
}

/// Ascending by period key; rows of the same period are ordered by business unit id.
pub fn sort_by_period(rows: &mut [AggregateRow]) {
    rows.sort_by(|a, b| {
        a.period_key
            .cmp(&b.period_key)
            .then_with(|| a.business_unit_id.cmp(&b.business_unit_id))
    });
}

/// Sum of `target` and `actual` across `rows`, with the derived percentage.
pub fn totals(rows: &[AggregateRow]) -> (f64, f64, f64) {
    let target: f64 = rows.iter().map(|r| r.target).sum();
    let actual: f64 = rows.iter().map(|r| r.actual).sum();
    (target, actual, percentage_of(actual, target, 2))
}

use crate::aggregator::AggregateRow;
use crate::error::{DashboardSeriesError, Result};
use crate::schema::CumulativeScope;
use crate::utils::percentage_of;
use serde::Serialize;
use std::collections::HashMap;

/// An [`AggregateRow`] plus running totals from the start of its scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeRow {
    #[serde(flatten)]
    row: AggregateRow,
    cumulative_target: f64,
    cumulative_actual: f64,
    cumulative_difference: f64,
    cumulative_percentage: f64,
}

impl CumulativeRow {
    pub fn row(&self) -> &AggregateRow {
        &self.row
    }

    pub fn cumulative_target(&self) -> f64 {
        self.cumulative_target
    }

    pub fn cumulative_actual(&self) -> f64 {
        self.cumulative_actual
    }

    pub fn cumulative_difference(&self) -> f64 {
        self.cumulative_difference
    }

    pub fn cumulative_percentage(&self) -> f64 {
        self.cumulative_percentage
    }
}

#[derive(Default)]
struct RunningTotal {
    year: Option<i32>,
    target: f64,
    actual: f64,
}

/// Running totals over rows sorted ascending by period key.
///
/// Each business unit accumulates on its own; summed rows share one accumulator.
/// With [`CumulativeScope::PerYear`] the totals restart whenever the year changes.
pub fn accumulate(rows: &[AggregateRow], scope: CumulativeScope) -> Result<Vec<CumulativeRow>> {
    let mut running: HashMap<Option<&str>, RunningTotal> = HashMap::new();
    let mut output = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        if idx > 0 && rows[idx - 1].period_key() > row.period_key() {
            return Err(DashboardSeriesError::UnsortedSeries {
                previous: rows[idx - 1].period_key().to_string(),
                next: row.period_key().to_string(),
            });
        }

        let total = running.entry(row.business_unit_id()).or_default();

        if scope == CumulativeScope::PerYear && total.year != Some(row.year()) {
            total.target = 0.0;
            total.actual = 0.0;
        }
        total.year = Some(row.year());
        total.target += row.target();
        total.actual += row.actual();

        output.push(CumulativeRow {
            row: row.clone(),
            cumulative_target: total.target,
            cumulative_actual: total.actual,
            cumulative_difference: total.actual - total.target,
            cumulative_percentage: percentage_of(total.actual, total.target, 0),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKey;

    fn row(year: i32, month: u32, target: f64, actual: f64) -> AggregateRow {
        AggregateRow::with_totals(PeriodKey::new(year, month).unwrap(), None, target, actual)
    }

    fn unit_row(year: i32, month: u32, unit: &str, target: f64, actual: f64) -> AggregateRow {
        AggregateRow::with_totals(
            PeriodKey::new(year, month).unwrap(),
            Some(unit.to_string()),
            target,
            actual,
        )
    }

    #[test]
    fn test_running_totals() {
        let rows = vec![row(2024, 1, 100.0, 90.0), row(2024, 2, 100.0, 120.0)];
        let cumulative = accumulate(&rows, CumulativeScope::PerYear).unwrap();

        assert_eq!(cumulative[0].cumulative_target(), 100.0);
        assert_eq!(cumulative[0].cumulative_actual(), 90.0);
        assert_eq!(cumulative[0].cumulative_percentage(), 90.0);
        assert_eq!(cumulative[1].cumulative_target(), 200.0);
        assert_eq!(cumulative[1].cumulative_actual(), 210.0);
        assert_eq!(cumulative[1].cumulative_difference(), 10.0);
        assert_eq!(cumulative[1].cumulative_percentage(), 105.0);
    }

    #[test]
    fn test_per_year_resets() {
        let rows = vec![
            row(2023, 11, 10.0, 10.0),
            row(2023, 12, 10.0, 5.0),
            row(2024, 1, 20.0, 30.0),
        ];

        let scoped = accumulate(&rows, CumulativeScope::PerYear).unwrap();
        assert_eq!(scoped[1].cumulative_target(), 20.0);
        assert_eq!(scoped[2].cumulative_target(), 20.0);
        assert_eq!(scoped[2].cumulative_actual(), 30.0);
        assert_eq!(scoped[2].cumulative_percentage(), 150.0);

        let unscoped = accumulate(&rows, CumulativeScope::Unscoped).unwrap();
        assert_eq!(unscoped[2].cumulative_target(), 40.0);
        assert_eq!(unscoped[2].cumulative_actual(), 45.0);
        assert_eq!(unscoped[2].cumulative_percentage(), 113.0);
    }

    #[test]
    fn test_zero_target_percentage() {
        let rows = vec![row(2024, 1, 0.0, 50.0)];
        let cumulative = accumulate(&rows, CumulativeScope::PerYear).unwrap();
        assert_eq!(cumulative[0].cumulative_percentage(), 0.0);
        assert_eq!(cumulative[0].cumulative_difference(), 50.0);
    }

    #[test]
    fn test_business_units_accumulate_separately() {
        let rows = vec![
            unit_row(2024, 1, "A", 100.0, 50.0),
            unit_row(2024, 1, "B", 10.0, 10.0),
            unit_row(2024, 2, "A", 100.0, 150.0),
            unit_row(2024, 2, "B", 10.0, 20.0),
        ];
        let cumulative = accumulate(&rows, CumulativeScope::PerYear).unwrap();
        assert_eq!(cumulative[2].cumulative_target(), 200.0);
        assert_eq!(cumulative[2].cumulative_actual(), 200.0);
        assert_eq!(cumulative[3].cumulative_target(), 20.0);
        assert_eq!(cumulative[3].cumulative_actual(), 30.0);
    }

    #[test]
    fn test_business_units_reset_at_year_boundary() {
        let rows = vec![
            unit_row(2023, 12, "A", 100.0, 80.0),
            unit_row(2023, 12, "B", 50.0, 50.0),
            unit_row(2024, 1, "A", 100.0, 120.0),
            unit_row(2024, 2, "B", 40.0, 20.0),
        ];

        let scoped = accumulate(&rows, CumulativeScope::PerYear).unwrap();
        assert_eq!(scoped[2].cumulative_target(), 100.0);
        assert_eq!(scoped[2].cumulative_actual(), 120.0);
        assert_eq!(scoped[2].cumulative_percentage(), 120.0);
        // B has no January row; its first 2024 row still starts fresh
        assert_eq!(scoped[3].cumulative_target(), 40.0);
        assert_eq!(scoped[3].cumulative_actual(), 20.0);
        assert_eq!(scoped[3].cumulative_difference(), -20.0);

        let unscoped = accumulate(&rows, CumulativeScope::Unscoped).unwrap();
        assert_eq!(unscoped[2].cumulative_target(), 200.0);
        assert_eq!(unscoped[2].cumulative_actual(), 200.0);
        assert_eq!(unscoped[3].cumulative_target(), 90.0);
        assert_eq!(unscoped[3].cumulative_actual(), 70.0);
        assert_eq!(unscoped[3].cumulative_percentage(), 78.0);
    }

    #[test]
    fn test_idempotent() {
        let rows = vec![
            row(2024, 1, 100.0, 90.0),
            row(2024, 2, 100.0, 120.0),
            row(2024, 3, 80.0, 40.0),
        ];
        let first = accumulate(&rows, CumulativeScope::PerYear).unwrap();
        let second = accumulate(&rows, CumulativeScope::PerYear).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_unsorted_input() {
        let rows = vec![row(2024, 2, 1.0, 1.0), row(2024, 1, 1.0, 1.0)];
        let result = accumulate(&rows, CumulativeScope::Unscoped);
        assert!(matches!(
            result,
            Err(DashboardSeriesError::UnsortedSeries { .. })
        ));
    }

    #[test]
    fn test_empty() {
        assert!(accumulate(&[], CumulativeScope::PerYear).unwrap().is_empty());
    }
}

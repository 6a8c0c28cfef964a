//! Series formatting for the charting layer.
//!
//! Rows become [`SeriesPoint`]s labelled `"<Mon> <Year>"`, and axis/tooltip numbers are
//! abbreviated through a [`NumberFormatStrategy`]. Two threshold tables ship with the
//! crate: the compact `K`/`M` style and the Indonesian `Ribu`/`Juta`/`Miliar` style.

use crate::aggregator::AggregateRow;
use crate::cumulative::CumulativeRow;
use crate::error::Result;
use crate::period::{month_name, PeriodKey};
use crate::schema::{NumberLocale, ValueType};
use crate::utils::round_to;
use serde::Serialize;

pub trait NumberFormatStrategy {
    fn format(&self, value: f64) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeTier {
    pub threshold: f64,
    pub divisor: f64,
    pub decimals: usize,
    pub suffix: &'static str,
}

/// Threshold-table formatter. Tiers are checked in order against the absolute value;
/// values below every tier print as a whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdFormat {
    tiers: Vec<MagnitudeTier>,
}

impl ThresholdFormat {
    pub fn new(mut tiers: Vec<MagnitudeTier>) -> Self {
        tiers.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Self { tiers }
    }

    /// `1.5M`, `15K`, `999`.
    pub fn compact() -> Self {
        Self::new(vec![
            MagnitudeTier {
                threshold: 1_000_000.0,
                divisor: 1_000_000.0,
                decimals: 1,
                suffix: "M",
            },
            MagnitudeTier {
                threshold: 1_000.0,
                divisor: 1_000.0,
                decimals: 0,
                suffix: "K",
            },
        ])
    }

    /// `2.5 Miliar`, `1.2 Juta`, `15 Ribu`.
    pub fn indonesian() -> Self {
        Self::new(vec![
            MagnitudeTier {
                threshold: 1_000_000_000.0,
                divisor: 1_000_000_000.0,
                decimals: 1,
                suffix: " Miliar",
            },
            MagnitudeTier {
                threshold: 1_000_000.0,
                divisor: 1_000_000.0,
                decimals: 1,
                suffix: " Juta",
            },
            MagnitudeTier {
                threshold: 1_000.0,
                divisor: 1_000.0,
                decimals: 0,
                suffix: " Ribu",
            },
        ])
    }

    pub fn tiers(&self) -> &[MagnitudeTier] {
        &self.tiers
    }
}

impl NumberFormatStrategy for ThresholdFormat {
    /// The tier is chosen from the value as it would print, so `999.7` reads `1K`
    /// rather than `1000`, and `999_950` reads `1.0M` rather than `1000K`.
    fn format(&self, value: f64) -> String {
        let mut shown = round_to(value, 0);
        let mut chosen = None;

        for tier in self.tiers.iter().rev() {
            if shown.abs() < tier.threshold {
                break;
            }
            let scaled = round_to(value / tier.divisor, tier.decimals as u32);
            shown = scaled * tier.divisor;
            chosen = Some((tier, scaled));
        }

        match chosen {
            Some((tier, scaled)) => format!("{:.*}{}", tier.decimals, scaled, tier.suffix),
            None => format!("{:.0}", without_negative_zero(shown)),
        }
    }
}

fn without_negative_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl NumberLocale {
    pub fn strategy(self) -> ThresholdFormat {
        match self {
            NumberLocale::Compact => ThresholdFormat::compact(),
            NumberLocale::Indonesian => ThresholdFormat::indonesian(),
        }
    }
}

/// `"Jan 2024"`.
pub fn period_label(year: i32, month: u32) -> Result<String> {
    Ok(format!("{} {}", month_name(month)?, year))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period: String,
    pub period_key: PeriodKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_unit_id: Option<String>,
    pub target: f64,
    pub actual: f64,
    pub difference: f64,
    pub percentage: f64,
    pub amount: f64,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_difference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_percentage: Option<f64>,
}

impl SeriesPoint {
    fn from_row(row: &AggregateRow) -> Result<Self> {
        Ok(Self {
            period: period_label(row.year(), row.month())?,
            period_key: row.period_key(),
            business_unit_id: row.business_unit_id().map(str::to_string),
            target: row.target(),
            actual: row.actual(),
            difference: row.difference(),
            percentage: row.percentage(),
            amount: row.amount(),
            count: row.count(),
            cumulative_target: None,
            cumulative_actual: None,
            cumulative_difference: None,
            cumulative_percentage: None,
        })
    }

    fn from_cumulative(row: &CumulativeRow) -> Result<Self> {
        let mut point = Self::from_row(row.row())?;
        point.cumulative_target = Some(row.cumulative_target());
        point.cumulative_actual = Some(row.cumulative_actual());
        point.cumulative_difference = Some(row.cumulative_difference());
        point.cumulative_percentage = Some(row.cumulative_percentage());
        Ok(point)
    }

    /// The scalar a single-series chart plots for `value_type`.
    pub fn value(&self, value_type: ValueType) -> f64 {
        match value_type {
            ValueType::Target => self.target,
            ValueType::Actual => self.actual,
            ValueType::Amount => self.amount,
            ValueType::Count => self.count as f64,
            ValueType::Difference => self.difference,
            ValueType::Percentage => self.percentage,
        }
    }
}

/// Display-ready series. An empty series is valid and flagged with `no_data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedSeries {
    pub points: Vec<SeriesPoint>,
    pub no_data: bool,
}

impl FormattedSeries {
    fn from_points(points: Vec<SeriesPoint>) -> Self {
        let no_data = points.is_empty();
        Self { points, no_data }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.period.as_str()).collect()
    }

    pub fn values(&self, value_type: ValueType) -> Vec<f64> {
        self.points.iter().map(|p| p.value(value_type)).collect()
    }

    pub fn formatted_values(
        &self,
        value_type: ValueType,
        strategy: &dyn NumberFormatStrategy,
    ) -> Vec<String> {
        self.points
            .iter()
            .map(|p| strategy.format(p.value(value_type)))
            .collect()
    }
}

pub fn format_rows(rows: &[AggregateRow]) -> Result<FormattedSeries> {
    let points = rows
        .iter()
        .map(SeriesPoint::from_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(FormattedSeries::from_points(points))
}

pub fn format_cumulative(rows: &[CumulativeRow]) -> Result<FormattedSeries> {
    let points = rows
        .iter()
        .map(SeriesPoint::from_cumulative)
        .collect::<Result<Vec<_>>>()?;
    Ok(FormattedSeries::from_points(points))
}

//! # Sales Dashboard Series
//!
//! Period aggregation and filtering for sales-operations dashboards: target-vs-actual
//! charts, cumulative growth, purchase-order status breakdowns and top customers.
//!
//! ## Core Concepts
//!
//! - **Record**: one monthly data point from the backend (target, actual, amount, status)
//! - **PeriodKey**: `year * 100 + month`, ordered like the calendar
//! - **FilterSelection**: the chart's UI filter (business unit, period range, value type)
//! - **Aggregation**: records grouped by period, optionally per business unit
//! - **Cumulative series**: running totals over the sorted aggregation, per year or unscoped
//!
//! Every stage is a pure function of its inputs, so a chart recomputes by calling the
//! pipeline again whenever a filter changes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_dashboard_series::*;
//! use chrono::NaiveDate;
//!
//! let records = vec![
//!     Record::new(2024, 1, "BU-1", 100.0, 90.0),
//!     Record::new(2024, 2, "BU-1", 100.0, 120.0),
//! ];
//!
//! let config = PipelineConfig {
//!     cumulative: Some(CumulativeScope::PerYear),
//!     ..PipelineConfig::default()
//! };
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let series = build_series(&records, &FilterSelection::all(), &config, today).unwrap();
//! assert_eq!(series.points[1].cumulative_percentage, Some(105.0));
//! ```

pub mod aggregator;
pub mod breakdown;
pub mod cumulative;
pub mod engine;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod ingestion;
pub mod period;
pub mod schema;
pub mod utils;

pub use aggregator::{aggregate, sort_by_period, AggregateRow};
pub use breakdown::{status_breakdown, top_customers, CustomerTotal, StatusBreakdownRow};
pub use cumulative::{accumulate, CumulativeRow};
pub use engine::{ChartData, SeriesPipeline};
pub use error::{DashboardSeriesError, Result};
pub use filter::{available_periods, lookback_periods, RecordFilter};
pub use formatter::{
    format_cumulative, format_rows, FormattedSeries, MagnitudeTier, NumberFormatStrategy,
    SeriesPoint, ThresholdFormat,
};
pub use ingestion::{records_from_json, records_from_reader, validate_records};
pub use period::{month_name, to_key, PeriodKey};
pub use schema::*;

use chrono::{Local, NaiveDate};

/// Runs the full pipeline once: filter → aggregate → sort → accumulate → format.
pub fn build_series(
    records: &[Record],
    selection: &FilterSelection,
    config: &PipelineConfig,
    today: NaiveDate,
) -> Result<FormattedSeries> {
    SeriesPipeline::new(config.clone()).series(records, selection, today)
}

/// Same as [`SeriesPipeline::run`], resolving relative periods against the local date.
pub fn build_chart_data(
    records: &[Record],
    selection: &FilterSelection,
    config: &PipelineConfig,
) -> Result<ChartData> {
    let today = Local::now().date_naive();
    SeriesPipeline::new(config.clone()).run(records, selection, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly_targets() -> Vec<Record> {
        vec![
            Record::new(2024, 1, "BU-1", 60.0, 50.0),
            Record::new(2024, 1, "BU-2", 40.0, 40.0),
            Record::new(2024, 2, "BU-1", 50.0, 70.0),
            Record::new(2024, 2, "BU-2", 50.0, 50.0),
        ]
    }

    #[test]
    fn test_end_to_end_cumulative() {
        let config = PipelineConfig {
            cumulative: Some(CumulativeScope::PerYear),
            ..PipelineConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let series = build_series(&monthly_targets(), &FilterSelection::all(), &config, today)
            .unwrap();

        assert_eq!(series.labels(), vec!["Jan 2024", "Feb 2024"]);
        assert_eq!(series.points[0].cumulative_target, Some(100.0));
        assert_eq!(series.points[0].cumulative_percentage, Some(90.0));
        assert_eq!(series.points[1].cumulative_target, Some(200.0));
        assert_eq!(series.points[1].cumulative_actual, Some(210.0));
        assert_eq!(series.points[1].cumulative_percentage, Some(105.0));
    }

    #[test]
    fn test_business_unit_selection() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let selection = FilterSelection::all().with_business_unit("BU-2");

        let series = build_series(
            &monthly_targets(),
            &selection,
            &PipelineConfig::default(),
            today,
        )
        .unwrap();

        assert_eq!(series.points.len(), 2);
        assert!(series.points.iter().all(|p| p.percentage == 100.0));
    }

    #[test]
    fn test_chart_data_against_local_date() {
        let data = build_chart_data(
            &monthly_targets(),
            &FilterSelection::all(),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(data.series.points.len(), 2);
        assert_eq!(data.total_target, 200.0);
    }
}

use crate::aggregator::{aggregate, sort_by_period, totals};
use crate::breakdown::{status_breakdown, top_customers, CustomerTotal, StatusBreakdownRow};
use crate::cumulative::accumulate;
use crate::error::Result;
use crate::filter::{available_periods, RecordFilter};
use crate::formatter::{format_cumulative, format_rows, FormattedSeries};
use crate::ingestion::validate_records;
use crate::schema::{AggregationMode, FilterSelection, PipelineConfig, Record};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

/// Everything one chart card needs, recomputed from scratch on every filter change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub series: FormattedSeries,
    pub total_target: f64,
    pub total_actual: f64,
    pub total_percentage: f64,
    /// Axis/tooltip strings for the selection's value type, if it names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_labels: Option<Vec<String>>,
    pub status_breakdown: Vec<StatusBreakdownRow>,
    pub top_customers: Vec<CustomerTotal>,
}

pub struct SeriesPipeline {
    config: PipelineConfig,
}

impl SeriesPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validates `records` and keeps those matching `selection`.
    pub fn filter_records<'a>(
        &self,
        records: &'a [Record],
        selection: &FilterSelection,
        today: NaiveDate,
    ) -> Result<Vec<&'a Record>> {
        validate_records(records)?;

        let available = available_periods(records);
        let filter = RecordFilter::build(selection, today, &available)?;
        let kept = filter.apply(records);

        debug!(
            "Filter kept {} of {} record(s) across {} available period(s)",
            kept.len(),
            records.len(),
            available.len()
        );

        Ok(kept)
    }

    /// filter → aggregate → sort → accumulate (if configured) → format.
    pub fn series(
        &self,
        records: &[Record],
        selection: &FilterSelection,
        today: NaiveDate,
    ) -> Result<FormattedSeries> {
        let kept = self.filter_records(records, selection, today)?;
        self.series_from_filtered(&kept)
    }

    fn series_from_filtered(&self, kept: &[&Record]) -> Result<FormattedSeries> {
        let mut rows = aggregate(kept.iter().copied(), self.config.aggregation)?;
        sort_by_period(&mut rows);

        let series = match self.config.cumulative {
            Some(scope) => format_cumulative(&accumulate(&rows, scope)?)?,
            None => format_rows(&rows)?,
        };

        debug!("Formatted {} point(s)", series.points.len());
        Ok(series)
    }

    pub fn run(
        &self,
        records: &[Record],
        selection: &FilterSelection,
        today: NaiveDate,
    ) -> Result<ChartData> {
        info!(
            "Building chart data for business unit '{}' with {:?}",
            selection.business_unit, selection.period
        );

        let kept = self.filter_records(records, selection, today)?;
        let series = self.series_from_filtered(&kept)?;

        let summed = aggregate(kept.iter().copied(), AggregationMode::AllUnitsSummed)?;
        let (total_target, total_actual, total_percentage) = totals(&summed);

        let value_labels = selection.value_type.map(|value_type| {
            let strategy = self.config.number_format.strategy();
            series.formatted_values(value_type, &strategy)
        });

        Ok(ChartData {
            total_target,
            total_actual,
            total_percentage,
            value_labels,
            status_breakdown: status_breakdown(kept.iter().copied()),
            top_customers: top_customers(kept.iter().copied(), self.config.top_customers),
            series,
        })
    }
}

impl Default for SeriesPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

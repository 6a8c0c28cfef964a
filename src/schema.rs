use crate::error::Result;
use crate::period::PeriodKey;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One monthly data point supplied by the backend (target/actual entry, purchase order,
/// quotation...). Numeric fields may be missing; they count as zero when summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    #[schemars(description = "Calendar year of the reporting period")]
    pub year: i32,

    #[schemars(description = "Calendar month of the reporting period (1 = January)")]
    pub month: u32,

    #[serde(deserialize_with = "deserialize_identifier")]
    #[schemars(
        with = "String",
        description = "Business unit identifier. Numeric ids from the backend are accepted and kept as text."
    )]
    pub business_unit_id: String,

    #[serde(default)]
    pub target: Option<f64>,

    #[serde(default)]
    pub actual: Option<f64>,

    #[serde(default)]
    #[schemars(description = "Monetary amount (quotation or purchase order value)")]
    pub amount: Option<f64>,

    #[serde(default)]
    #[schemars(description = "Workflow status, e.g. purchase order status")]
    pub status: Option<String>,

    #[serde(default)]
    #[schemars(description = "Customer name, used by the top-customer breakdown")]
    pub customer: Option<String>,
}

impl Record {
    pub fn new(
        year: i32,
        month: u32,
        business_unit_id: impl Into<String>,
        target: f64,
        actual: f64,
    ) -> Self {
        Self {
            year,
            month,
            business_unit_id: business_unit_id.into(),
            target: Some(target),
            actual: Some(actual),
            amount: None,
            status: None,
            customer: None,
        }
    }

    pub fn period_key(&self) -> Result<PeriodKey> {
        PeriodKey::new(self.year, self.month)
    }

    pub fn target_or_zero(&self) -> f64 {
        self.target.unwrap_or(0.0)
    }

    pub fn actual_or_zero(&self) -> f64 {
        self.actual.unwrap_or(0.0)
    }

    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

fn deserialize_identifier<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Identifier {
        Text(String),
        Integer(i64),
    }

    Ok(match Identifier::deserialize(deserializer)? {
        Identifier::Text(s) => s,
        Identifier::Integer(n) => n.to_string(),
    })
}

/// Business-unit restriction. Serialized as the literal `"all"` or the unit id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BusinessUnitFilter {
    #[default]
    All,
    Unit(String),
}

impl BusinessUnitFilter {
    pub fn matches(&self, business_unit_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Unit(id) => id == business_unit_id,
        }
    }
}

impl fmt::Display for BusinessUnitFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Unit(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for BusinessUnitFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BusinessUnitFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = deserialize_identifier(deserializer)?;
        Ok(if id.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Unit(id)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodFilter {
    #[default]
    #[schemars(description = "Every period present in the dataset")]
    All,

    #[schemars(description = "Every month of one calendar year")]
    Year { year: i32 },

    #[schemars(description = "The current calendar month, if the dataset has it")]
    CurrentMonth,

    #[schemars(
        description = "Walks back from the current month (inclusive). Only 3, 6 and 12 are accepted; months missing from the dataset are skipped."
    )]
    LastNMonths { months: u32 },

    #[schemars(
        description = "Inclusive range of period keys (YYYYMM). A missing bound leaves that side open."
    )]
    CustomRange {
        #[serde(default)]
        start: Option<PeriodKey>,
        #[serde(default)]
        end: Option<PeriodKey>,
    },

    #[schemars(description = "Exactly one month")]
    CustomSpecific { year: i32, month: u32 },
}

/// Scalar a single-series chart plots from each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Target,
    Actual,
    Amount,
    Count,
    Difference,
    Percentage,
}

/// UI filter state for one chart. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct FilterSelection {
    #[serde(default, alias = "business_unit_id", alias = "businessUnitId")]
    #[schemars(with = "String", description = "\"all\" or a business unit id")]
    pub business_unit: BusinessUnitFilter,

    #[serde(default, alias = "year_or_range", alias = "yearOrRange")]
    pub period: PeriodFilter,

    #[serde(default, alias = "valueType")]
    pub value_type: Option<ValueType>,
}

impl FilterSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_business_unit(mut self, id: impl Into<String>) -> Self {
        self.business_unit = BusinessUnitFilter::Unit(id.into());
        self
    }

    pub fn with_period(mut self, period: PeriodFilter) -> Self {
        self.period = period;
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FilterSelection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    #[schemars(description = "One row per period and business unit")]
    PerBusinessUnit,

    #[default]
    #[schemars(description = "One row per period, summed across business units")]
    AllUnitsSummed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CumulativeScope {
    #[schemars(description = "Running totals restart at the first month of each year")]
    PerYear,

    #[schemars(description = "Running totals span every year in the series")]
    Unscoped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumberLocale {
    #[default]
    #[schemars(description = "K / M suffixes")]
    Compact,

    #[schemars(description = "Ribu / Juta / Miliar suffixes")]
    Indonesian,
}

fn default_top_customers() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PipelineConfig {
    #[serde(default)]
    pub aggregation: AggregationMode,

    #[serde(default)]
    #[schemars(description = "Produce running totals. Omit for a plain per-period series.")]
    pub cumulative: Option<CumulativeScope>,

    #[serde(default)]
    pub number_format: NumberLocale,

    #[serde(default = "default_top_customers")]
    #[schemars(description = "How many customers the top-customer breakdown keeps")]
    pub top_customers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationMode::default(),
            cumulative: None,
            number_format: NumberLocale::default(),
            top_customers: default_top_customers(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PipelineConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

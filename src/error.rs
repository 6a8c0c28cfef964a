use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardSeriesError {
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid lookback of {0} months: must be 3, 6 or 12")]
    InvalidLookback(u32),

    #[error("Series is not sorted by period: {previous} is followed by {next}")]
    UnsortedSeries { previous: String, next: String },

    #[error("Invalid record #{index}: {details}")]
    InvalidRecord { index: usize, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardSeriesError>;

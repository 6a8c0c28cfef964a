use crate::error::{DashboardSeriesError, Result};
use crate::schema::Record;
use crate::utils::{validate_month, validate_year};
use log::warn;
use serde::Deserialize;
use std::io::Read;

/// Either a bare array of records or page props carrying them under `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordPayload {
    Bare(Vec<Record>),
    PageProps { data: Vec<Record> },
}

impl RecordPayload {
    fn into_records(self) -> Vec<Record> {
        match self {
            RecordPayload::Bare(records) => records,
            RecordPayload::PageProps { data } => data,
        }
    }
}

pub fn records_from_json(json: &str) -> Result<Vec<Record>> {
    let payload: RecordPayload = serde_json::from_str(json)?;
    Ok(payload.into_records())
}

pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
    let payload: RecordPayload = serde_json::from_reader(reader)?;
    Ok(payload.into_records())
}

/// Rejects records whose month is outside 1..=12 or whose year is outside 1..=9999. Records missing `target` or `actual`
/// pass; they are summed as zero.
pub fn validate_records(records: &[Record]) -> Result<()> {
    let mut missing = 0usize;

    for (index, record) in records.iter().enumerate() {
        validate_month(record.month)
            .and_then(|_| validate_year(record.year))
            .map_err(|e| DashboardSeriesError::InvalidRecord {
                index,
                details: e.to_string(),
            })?;

        if record.target.is_none() || record.actual.is_none() {
            missing += 1;
        }
    }

    if missing > 0 {
        warn!(
            "{} record(s) are missing target or actual; treating the gaps as 0",
            missing
        );
    }

    Ok(())
}

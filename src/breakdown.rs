use crate::schema::Record;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

pub const UNKNOWN_STATUS: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBreakdownRow {
    pub status: String,
    pub count: usize,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotal {
    pub customer: String,
    pub amount: f64,
    pub count: usize,
}

/// Record counts and amounts per status, most frequent status first.
pub fn status_breakdown<'a, I>(records: I) -> Vec<StatusBreakdownRow>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut by_status: BTreeMap<&str, (usize, f64)> = BTreeMap::new();

    for record in records {
        let status = record
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_STATUS);
        let entry = by_status.entry(status).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.amount_or_zero();
    }

    let mut rows: Vec<StatusBreakdownRow> = by_status
        .into_iter()
        .map(|(status, (count, amount))| StatusBreakdownRow {
            status: status.to_string(),
            count,
            amount,
        })
        .collect();

    // BTreeMap already ordered names; the stable sort keeps that as the tie-break
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// The `limit` customers with the largest summed `amount`. Records without a customer
/// are ignored.
pub fn top_customers<'a, I>(records: I, limit: usize) -> Vec<CustomerTotal>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut by_customer: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        match record.customer.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                let entry = by_customer.entry(name).or_insert((0.0, 0));
                entry.0 += record.amount_or_zero();
                entry.1 += 1;
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("{} record(s) without a customer left out of the ranking", skipped);
    }

    let mut totals: Vec<CustomerTotal> = by_customer
        .into_iter()
        .map(|(customer, (amount, count))| CustomerTotal {
            customer: customer.to_string(),
            amount,
            count,
        })
        .collect();

    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals.truncate(limit);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: Option<&str>, customer: Option<&str>, amount: f64) -> Record {
        let mut record = Record::new(2024, 1, "A", 0.0, 0.0);
        record.status = status.map(str::to_string);
        record.customer = customer.map(str::to_string);
        record.amount = Some(amount);
        record
    }

    #[test]
    fn test_status_breakdown() {
        let records = vec![
            order(Some("Open"), None, 100.0),
            order(Some("Closed"), None, 50.0),
            order(Some("Open"), None, 25.0),
            order(None, None, 10.0),
            order(Some("  "), None, 5.0),
            order(Some("Cancelled"), None, 1.0),
        ];

        let rows = status_breakdown(&records);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].status, "Open");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].amount, 125.0);
        assert_eq!(rows[1].status, UNKNOWN_STATUS);
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[2].status, "Cancelled");
        assert_eq!(rows[3].status, "Closed");
    }

    #[test]
    fn test_top_customers() {
        let records = vec![
            order(None, Some("PT Maju"), 500.0),
            order(None, Some("CV Sentosa"), 300.0),
            order(None, Some("PT Maju"), 200.0),
            order(None, Some("Abadi"), 300.0),
            order(None, None, 10_000.0),
        ];

        let top = top_customers(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].customer, "PT Maju");
        assert_eq!(top[0].amount, 700.0);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[1].customer, "Abadi");

        assert!(top_customers(&records, 0).is_empty());
        assert_eq!(top_customers(&records, 10).len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        let records: Vec<Record> = Vec::new();
        assert!(status_breakdown(&records).is_empty());
        assert!(top_customers(&records, 5).is_empty());
    }
}

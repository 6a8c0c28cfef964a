use crate::error::{DashboardSeriesError, Result};

/// Rounds `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `actual / target * 100` rounded to `decimals` places.
///
/// A zero (or negative) target yields `0.0` rather than NaN or infinity.
pub fn percentage_of(actual: f64, target: f64, decimals: u32) -> f64 {
    if target > 0.0 {
        round_to(actual / target * 100.0, decimals)
    } else {
        0.0
    }
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(DashboardSeriesError::InvalidMonth(month));
    }
    Ok(())
}

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Keeps `year * 100 + month` and its neighbouring months well inside `i32`.
pub fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DashboardSeriesError::InvalidPeriod(format!(
            "year {} is outside {}..={}",
            year, MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

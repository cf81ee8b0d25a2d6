//! Shared helpers for series invariants.

use crate::CalmapError;
use crate::types::Observation;

/// Ensure observation dates are strictly increasing (sorted, no duplicates).
///
/// # Errors
/// Returns `Err(CalmapError::Data)` naming the first offending date.
pub fn ensure_strictly_increasing(points: &[Observation]) -> Result<(), CalmapError> {
    for pair in points.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(CalmapError::Data(format!(
                "series dates must be strictly increasing: {} follows {}",
                pair[1].date, pair[0].date
            )));
        }
    }
    Ok(())
}

/// Ensure every observation carries exactly `width` values.
///
/// # Errors
/// Returns `Err(CalmapError::Data)` if any row is wider or narrower than `width`.
pub fn ensure_uniform_width(width: usize, points: &[Observation]) -> Result<(), CalmapError> {
    if let Some(p) = points.iter().find(|p| p.values.len() != width) {
        return Err(CalmapError::Data(format!(
            "row at {} has {} values, expected {width}",
            p.date,
            p.values.len()
        )));
    }
    Ok(())
}

/// Sort rows by date and drop later duplicates of the same date.
///
/// Providers that cannot promise ordering call this before building a
/// [`TimeSeries`](crate::TimeSeries).
pub fn sort_dedup_by_date(points: &mut Vec<Observation>) {
    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
}

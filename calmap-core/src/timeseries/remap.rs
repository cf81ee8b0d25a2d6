use chrono::NaiveDate;

use crate::CalmapError;
use crate::types::{BeforeStartPolicy, Observation, TimeSeries};

/// One requested date with the value known on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped {
    /// Requested date.
    pub date: NaiveDate,
    /// Date of the source observation the values were taken from (`<= date`).
    pub as_of: NaiveDate,
    /// Values of that observation, in field order.
    pub values: Vec<f64>,
}

/// Result of mapping a series onto a target calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct Remapped {
    /// Field names, in value order.
    pub fields: Vec<String>,
    /// Matched targets in ascending date order; duplicates kept.
    pub entries: Vec<Mapped>,
    /// Targets earlier than the first source observation, ascending.
    pub unmatched: Vec<NaiveDate>,
}

impl Remapped {
    /// Apply the before-start policy and return the final entries.
    ///
    /// # Errors
    /// Returns `CalmapError::Computation` when `Reject` meets an unmatched
    /// target, or when no entry is left to return.
    pub fn resolve(self, policy: BeforeStartPolicy) -> Result<Vec<Mapped>, CalmapError> {
        if let (BeforeStartPolicy::Reject, Some(first)) = (policy, self.unmatched.first()) {
            return Err(CalmapError::computation(format!(
                "{} requested date(s) precede the series, earliest {first}",
                self.unmatched.len()
            )));
        }
        if self.entries.is_empty() {
            return Err(CalmapError::computation(
                "no requested date has a known value",
            ));
        }
        Ok(self.entries)
    }
}

/// Index of the latest observation dated on or before `target`.
#[must_use]
pub fn floor_index(points: &[Observation], target: NaiveDate) -> Option<usize> {
    points.partition_point(|p| p.date <= target).checked_sub(1)
}

/// Forward-fill `series` onto `targets`.
///
/// Each target takes the values of the latest observation on or before it,
/// found by binary search. Targets after the last observation carry the last
/// value forward. Targets before the first observation have no value and are
/// reported in [`Remapped::unmatched`].
///
/// Output is sorted ascending by date; the sort is stable so duplicate
/// targets stay adjacent and identical.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "calmap_core::remap",
        skip(series, targets),
        fields(points = series.len(), targets = targets.len()),
    )
)]
#[must_use]
pub fn remap(series: &TimeSeries, targets: &[NaiveDate]) -> Remapped {
    let points = series.points();
    let mut sorted = targets.to_vec();
    sorted.sort();

    let mut entries = Vec::with_capacity(sorted.len());
    let mut unmatched = Vec::new();
    for date in sorted {
        match floor_index(points, date) {
            Some(i) => entries.push(Mapped {
                date,
                as_of: points[i].date,
                values: points[i].values.clone(),
            }),
            None => unmatched.push(date),
        }
    }
    #[cfg(feature = "tracing")]
    if !unmatched.is_empty() {
        tracing::debug!(count = unmatched.len(), "targets precede the series");
    }

    Remapped {
        fields: series.fields().to_vec(),
        entries,
        unmatched,
    }
}

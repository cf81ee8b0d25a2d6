use crate::types::{Observation, TimeSeries};

/// Trailing moving average over `window` observations.
///
/// The value at position `i` is the per-field mean of positions
/// `max(0, i - window + 1)..=i`. The window narrows at the start instead of
/// leaving leading gaps, and never looks past `i`.
///
/// A `window` of 0 or 1 returns the series unchanged.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rolling_mean(series: TimeSeries, window: usize) -> TimeSeries {
    if window <= 1 || series.len() < 2 {
        return series;
    }
    let width = series.fields().len();
    let points = series.points();
    let averaged: Vec<Observation> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let from = (i + 1).saturating_sub(window);
            let span = &points[from..=i];
            let n = span.len() as f64;
            let values = (0..width)
                .map(|f| span.iter().map(|q| q.values[f]).sum::<f64>() / n)
                .collect();
            Observation::new(p.date, values)
        })
        .collect();
    let (fields, _) = series.into_parts();
    TimeSeries::from_parts_unchecked(fields, averaged)
}

use chrono::{Datelike, NaiveDate};

use crate::CalmapError;
use crate::timeseries::dates::month_end;
use crate::types::{CollapseFunc, CollapsePeriod, Observation, TimeSeries};

/// Last day of the `period` bucket containing `date`.
///
/// Buckets are half-open intervals `(previous end, end]`, so the label is
/// always on or after every member date.
#[must_use]
pub fn period_end(date: NaiveDate, period: CollapsePeriod) -> Option<NaiveDate> {
    match period {
        CollapsePeriod::Monthly => month_end(date),
        CollapsePeriod::Quarterly => {
            let last_month = date.month0() / 3 * 3 + 3;
            NaiveDate::from_ymd_opt(date.year(), last_month, 1).and_then(month_end)
        }
        CollapsePeriod::Annual => NaiveDate::from_ymd_opt(date.year(), 12, 31),
    }
}

/// Running per-field accumulator for one bucket.
struct BucketAgg {
    label: NaiveDate,
    count: usize,
    sum: Vec<f64>,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl BucketAgg {
    fn start(label: NaiveDate, values: &[f64]) -> Self {
        Self {
            label,
            count: 1,
            sum: values.to_vec(),
            min: values.to_vec(),
            max: values.to_vec(),
        }
    }

    fn push(&mut self, values: &[f64]) {
        self.count += 1;
        for (i, &v) in values.iter().enumerate() {
            self.sum[i] += v;
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, func: CollapseFunc) -> Observation {
        let values = match func {
            CollapseFunc::Mean => {
                let n = self.count as f64;
                self.sum.into_iter().map(|s| s / n).collect()
            }
            CollapseFunc::Min => self.min,
            CollapseFunc::Max => self.max,
        };
        Observation::new(self.label, values)
    }
}

/// Generic collapser that groups a sorted series by a bucket function and
/// aggregates each field within each bucket.
///
/// `bucket_of` must be non-decreasing in its argument so that equal labels
/// are contiguous in a sorted series.
fn collapse_by<F>(
    series: TimeSeries,
    func: CollapseFunc,
    bucket_of: F,
) -> Result<TimeSeries, CalmapError>
where
    F: Fn(NaiveDate) -> Option<NaiveDate>,
{
    let (fields, points) = series.into_parts();
    let mut out: Vec<Observation> = Vec::new();
    let mut current: Option<BucketAgg> = None;

    for p in points {
        let label = bucket_of(p.date).ok_or_else(|| {
            CalmapError::Data(format!("no collapse bucket for observation at {}", p.date))
        })?;
        match current.as_mut() {
            Some(agg) if agg.label == label => agg.push(&p.values),
            _ => {
                if let Some(done) = current.replace(BucketAgg::start(label, &p.values)) {
                    out.push(done.finish(func));
                }
            }
        }
    }
    if let Some(done) = current {
        out.push(done.finish(func));
    }

    TimeSeries::new(fields, out)
}

/// Collapse a series into calendar periods labelled by their last day.
///
/// - Each non-empty bucket yields one observation dated at the bucket end.
/// - Empty buckets yield nothing; no zeros or gaps are fabricated.
/// - Each field is aggregated independently with `func`.
///
/// An empty input collapses to an empty series with the same fields.
///
/// # Errors
/// Returns `Err(CalmapError::Data)` if a bucket label falls outside the
/// supported calendar.
///
/// ```
/// use calmap_core::{collapse, CollapseFunc, CollapsePeriod, TimeSeries};
/// use chrono::NaiveDate;
/// fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }
/// let s = TimeSeries::single("px", [(d(2020, 1, 5), 5.0), (d(2020, 1, 20), 9.0), (d(2020, 2, 10), 3.0)]).unwrap();
/// let out = collapse(s, CollapsePeriod::Monthly, CollapseFunc::Max).unwrap();
/// let dates: Vec<_> = out.dates().collect();
/// assert_eq!(dates, vec![d(2020, 1, 31), d(2020, 2, 29)]);
/// assert_eq!(out.points()[0].values, vec![9.0]);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "calmap_core::collapse",
        skip(series),
        fields(points = series.len()),
    )
)]
pub fn collapse(
    series: TimeSeries,
    period: CollapsePeriod,
    func: CollapseFunc,
) -> Result<TimeSeries, CalmapError> {
    collapse_by(series, func, move |d| period_end(d, period))
}

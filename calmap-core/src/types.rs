//! Series and request types passed between the provider and the pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CalmapError;
use crate::timeseries::util::{
    ensure_strictly_increasing, ensure_uniform_width, sort_dedup_by_date,
};
pub use calmap_types::{
    BeforeStartPolicy, CalmapConfig, CollapseFunc, CollapsePeriod, ColumnSelector, ErrorKind,
    FetchStrategy, MonthEndPolicy,
};

/// One dated row of a series: a value per field, in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation (midnight, implicit UTC).
    pub date: NaiveDate,
    /// Values aligned with [`TimeSeries::fields`].
    pub values: Vec<f64>,
}

impl Observation {
    /// Build an observation from a date and its values.
    #[must_use]
    pub const fn new(date: NaiveDate, values: Vec<f64>) -> Self {
        Self { date, values }
    }
}

/// An ordered, duplicate-free sequence of dated observations over named fields.
///
/// Invariants (checked by [`TimeSeries::new`]):
/// - dates are strictly increasing;
/// - every observation carries exactly one value per field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    fields: Vec<String>,
    points: Vec<Observation>,
}

impl TimeSeries {
    /// Build a series, validating ordering and row width.
    ///
    /// # Errors
    /// Returns `CalmapError::Data` if dates are not strictly increasing or a row's
    /// width differs from the number of fields.
    pub fn new(fields: Vec<String>, points: Vec<Observation>) -> Result<Self, CalmapError> {
        if fields.is_empty() {
            return Err(CalmapError::Data("series has no fields".into()));
        }
        ensure_uniform_width(fields.len(), &points)?;
        ensure_strictly_increasing(&points)?;
        Ok(Self { fields, points })
    }

    /// Build a single-field series from `(date, value)` pairs.
    ///
    /// # Errors
    /// Same as [`TimeSeries::new`].
    pub fn single<I>(field: impl Into<String>, rows: I) -> Result<Self, CalmapError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let points = rows
            .into_iter()
            .map(|(date, v)| Observation::new(date, vec![v]))
            .collect();
        Self::new(vec![field.into()], points)
    }

    /// Build a series from provider rows that may contain gaps.
    ///
    /// Selects the fields named by `column`, drops every row with a missing or
    /// non-finite value in a selected field, then sorts by date and keeps the
    /// first row for each date.
    ///
    /// # Errors
    /// - `CalmapError::NotFound` if a named column is not in `fields`.
    /// - `CalmapError::Data` if a row's width differs from `fields`.
    pub fn from_rows(
        fields: Vec<String>,
        rows: Vec<(NaiveDate, Vec<Option<f64>>)>,
        column: &ColumnSelector,
    ) -> Result<Self, CalmapError> {
        let total = fields.len();
        let (fields, picks): (Vec<String>, Vec<usize>) = match column.name() {
            None => {
                let picks = (0..fields.len()).collect();
                (fields, picks)
            }
            Some(name) => {
                let idx = fields
                    .iter()
                    .position(|f| f == name)
                    .ok_or_else(|| CalmapError::not_found(format!("column '{name}'")))?;
                (vec![name.to_string()], vec![idx])
            }
        };
        let mut points = Vec::with_capacity(rows.len());
        for (date, raw) in rows {
            if raw.len() != total {
                return Err(CalmapError::Data(format!(
                    "row at {date} has {} values, expected {total}",
                    raw.len()
                )));
            }
            let values: Option<Vec<f64>> = picks
                .iter()
                .map(|&i| raw[i].filter(|v| v.is_finite()))
                .collect();
            if let Some(values) = values {
                points.push(Observation::new(date, values));
            }
        }
        sort_dedup_by_date(&mut points);
        Self::new(fields, points)
    }

    /// Series with the given fields and no observations.
    #[must_use]
    pub const fn empty(fields: Vec<String>) -> Self {
        Self {
            fields,
            points: Vec::new(),
        }
    }

    /// Construct without re-checking invariants. Callers must uphold them.
    pub(crate) const fn from_parts_unchecked(fields: Vec<String>, points: Vec<Observation>) -> Self {
        Self { fields, points }
    }

    /// Field names, in value order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Observations in ascending date order.
    #[must_use]
    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over observation dates.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Split into field names and observations.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Observation>) {
        (self.fields, self.points)
    }

    /// Keep only observations whose date lies inside `range` (inclusive).
    #[must_use]
    pub fn restrict(self, range: DateRange) -> Self {
        let points = self
            .points
            .into_iter()
            .filter(|p| range.contains(p.date))
            .collect();
        Self::from_parts_unchecked(self.fields, points)
    }
}

/// Inclusive calendar date range used to query a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; `start` must not be after `end`.
    ///
    /// # Errors
    /// Returns `CalmapError::Validation` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalmapError> {
        if start > end {
            return Err(CalmapError::validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First date of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// True when `date` lies inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A request for one symbol's raw series over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRequest {
    /// Opaque dataset identifier understood by the provider (e.g. "LBMA/GOLD").
    pub symbol: String,
    /// Fields to return.
    pub column: ColumnSelector,
    /// Inclusive date range to fetch.
    pub range: DateRange,
}

impl SeriesRequest {
    /// Convenience constructor.
    pub fn new(symbol: impl Into<String>, column: ColumnSelector, range: DateRange) -> Self {
        Self {
            symbol: symbol.into(),
            column,
            range,
        }
    }
}

use std::collections::HashSet;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::CalmapError;
use crate::types::{DateRange, MonthEndPolicy};

/// Accepted layouts for requested dates, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `YYYY-MM-DD`, e.g. `2020-01-31`.
    YearMonthDay,
    /// `YYYY-MM`, e.g. `2020-01`.
    YearMonth,
    /// `YYYY-Mon`, e.g. `2020-Jan`.
    YearMonthName,
}

impl DateFormat {
    /// Formats in priority order.
    pub const PRIORITY: [Self; 3] = [Self::YearMonthDay, Self::YearMonth, Self::YearMonthName];

    /// True for layouts that name a month rather than a day.
    #[must_use]
    pub const fn is_month_granular(self) -> bool {
        matches!(self, Self::YearMonth | Self::YearMonthName)
    }

    /// Parse one string under this layout. Month layouts yield the first of the month.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<NaiveDate> {
        match self {
            Self::YearMonthDay => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
            Self::YearMonth => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok(),
            Self::YearMonthName => {
                NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%b-%d").ok()
            }
        }
    }
}

/// Requested dates parsed under a single layout, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDates {
    /// Layout that parsed every input.
    pub format: DateFormat,
    /// Parsed dates, duplicates and order preserved.
    pub dates: Vec<NaiveDate>,
}

/// The calendar a request is remapped onto, plus the range to fetch for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCalendar {
    /// Final requested dates, duplicates and request order preserved.
    pub dates: Vec<NaiveDate>,
    /// Provider query range: `[min(dates) - lookback, max(dates)]`.
    pub query: DateRange,
}

/// Parse every string with the first layout that accepts all of them.
///
/// Layouts are tried in [`DateFormat::PRIORITY`] order; mixing layouts inside
/// one request is rejected.
///
/// # Errors
/// - `CalmapError::Validation` if `raw` is empty.
/// - `CalmapError::Parse` if no single layout parses every string.
pub fn parse_dates<S: AsRef<str>>(raw: &[S]) -> Result<ParsedDates, CalmapError> {
    if raw.is_empty() {
        return Err(CalmapError::validation("dates must be a non-empty list"));
    }
    for format in DateFormat::PRIORITY {
        let parsed: Option<Vec<NaiveDate>> = raw.iter().map(|s| format.parse(s.as_ref())).collect();
        if let Some(dates) = parsed {
            return Ok(ParsedDates { format, dates });
        }
    }
    Err(CalmapError::parse(format!(
        "no accepted format (YYYY-MM-DD, YYYY-MM, YYYY-Mon) parses all of {} dates",
        raw.len()
    )))
}

/// Last calendar day of the month containing `date`.
#[must_use]
pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))
}

/// Apply the month-end resolution rule to parsed dates.
///
/// When the policy makes the dates eligible, each is moved to its month end,
/// but only if more than one date was requested and the moved dates are
/// pairwise distinct. In every other case the parsed dates are returned
/// unchanged, so a single `2020-01` stays `2020-01-01`.
#[must_use]
pub fn resolve_month_end(parsed: ParsedDates, policy: MonthEndPolicy) -> Vec<NaiveDate> {
    let eligible = match policy {
        MonthEndPolicy::MonthInputsWhenDistinct => parsed.format.is_month_granular(),
        MonthEndPolicy::AnyInputWhenDistinct => true,
        MonthEndPolicy::Never => false,
    };
    if !eligible || parsed.dates.len() < 2 {
        return parsed.dates;
    }
    let Some(resolved) = parsed
        .dates
        .iter()
        .map(|d| month_end(*d))
        .collect::<Option<Vec<_>>>()
    else {
        return parsed.dates;
    };
    let distinct: HashSet<&NaiveDate> = resolved.iter().collect();
    if distinct.len() == resolved.len() {
        resolved
    } else {
        parsed.dates
    }
}

/// Parse, resolve, and derive the provider query range for requested dates.
///
/// # Errors
/// - `CalmapError::Validation` for an empty list.
/// - `CalmapError::Parse` when no layout parses every date, or the lookback
///   pad leaves the supported calendar.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "calmap_core::dates::normalize", skip(raw), fields(n = raw.len()))
)]
pub fn normalize<S: AsRef<str>>(
    raw: &[S],
    policy: MonthEndPolicy,
    lookback_days: u32,
) -> Result<TargetCalendar, CalmapError> {
    let parsed = parse_dates(raw)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(format = ?parsed.format, "requested dates parsed");
    let dates = resolve_month_end(parsed, policy);

    let (Some(&min), Some(&max)) = (dates.iter().min(), dates.iter().max()) else {
        return Err(CalmapError::validation("dates must be a non-empty list"));
    };
    let start = min
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .ok_or_else(|| CalmapError::parse(format!("lookback before {min} is out of range")))?;
    let query = DateRange::new(start, max)?;
    Ok(TargetCalendar { dates, query })
}

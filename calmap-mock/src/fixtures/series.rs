use chrono::{Datelike, NaiveDate, Weekday};

/// Raw fixture table: field names plus rows that may contain gaps.
pub struct RawSeries {
    pub fields: &'static [&'static str],
    pub rows: Vec<(NaiveDate, Vec<Option<f64>>)>,
}

pub fn by_symbol(s: &str) -> Option<RawSeries> {
    match s {
        "SCENARIO/BASIC" => Some(single(&[
            ("2020-01-01", 100.0),
            ("2020-01-05", 110.0),
            ("2020-02-01", 120.0),
        ])),
        "SCENARIO/MONTHLY" => Some(single(&[
            ("2020-01-05", 5.0),
            ("2020-01-20", 9.0),
            ("2020-02-10", 3.0),
        ])),
        "SCENARIO/DAILY" => Some(single(&[
            ("2021-02-01", 10.0),
            ("2021-02-02", 20.0),
            ("2021-02-03", 30.0),
        ])),
        "LBMA/GOLD" => Some(gold()),
        "EMPTY" => Some(RawSeries {
            fields: &["Value"],
            rows: Vec::new(),
        }),
        _ => None,
    }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn single(rows: &[(&str, f64)]) -> RawSeries {
    RawSeries {
        fields: &["Value"],
        rows: rows
            .iter()
            .map(|&(d, v)| (day(d), vec![Some(v)]))
            .collect(),
    }
}

/// Weekday AM/PM fixings for 2019-10-01..=2020-12-31.
///
/// AM is `1500 + day of year`; PM is AM + 0.5. The PM fixing is missing on the
/// first business day of each month.
fn gold() -> RawSeries {
    let mut rows = Vec::new();
    let mut d = day("2019-10-01");
    let end = day("2020-12-31");
    let mut last_month = 0;
    while d <= end {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            let am = 1500.0 + f64::from(d.ordinal());
            let pm = if d.month() == last_month {
                Some(am + 0.5)
            } else {
                None
            };
            last_month = d.month();
            rows.push((d, vec![Some(am), pm]));
        }
        let Some(next) = d.succ_opt() else { break };
        d = next;
    }
    RawSeries {
        fields: &["USD (AM)", "USD (PM)"],
        rows,
    }
}

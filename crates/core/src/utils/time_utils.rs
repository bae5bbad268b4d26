use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Iterates every calendar date from `start` to `end`, both inclusive.
///
/// Yields nothing when `end` is before `start`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Iterates every calendar date from `start` up to, but excluding, `until`.
pub fn days_before(start: NaiveDate, until: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day < until)
}

/// Number of calendar days in the inclusive range `[start, end]`, or 0 when
/// the range is inverted.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> u64 {
    let span = (end - start).num_days();
    if span < 0 {
        0
    } else {
        span as u64 + 1
    }
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    days_in_range(start, end).collect()
}

/// Storage keeps timestamps as naive UTC.
pub fn to_naive_utc(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc()
}

pub fn from_naive_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    naive.and_utc()
}

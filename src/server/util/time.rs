//! Date and time helpers.
//!
//! All timestamps are stored as UTC `NaiveDateTime`.

use chrono::{Months, NaiveDate, NaiveDateTime, Utc};

use crate::server::error::Error;

/// English month abbreviations used for chart labels.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Current UTC time without timezone.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Compact `yyyymmdd` stamp used in invoice and tracking numbers.
pub fn date_stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d").to_string()
}

/// Midnight at the start of the given day.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// The same day one calendar month earlier, clamped to the end of a shorter month.
///
/// # Returns
/// - `Ok(NaiveDate)` - The date one month before `date`
/// - `Err(Error::ParseError)` - The result falls outside the supported calendar
pub fn month_before(date: NaiveDate) -> Result<NaiveDate, Error> {
    date.checked_sub_months(Months::new(1))
        .ok_or_else(|| Error::ParseError(format!("Date {} is out of range", date)))
}

/// Half-open range from `start` through the whole of the inclusive `end` day.
pub fn inclusive_day_range(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(NaiveDateTime, NaiveDateTime), Error> {
    let after_end = end
        .succ_opt()
        .ok_or_else(|| Error::ParseError(format!("Date {} is out of range", end)))?;

    Ok((start_of_day(start), start_of_day(after_end)))
}

//! Date helper functions

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

/// Format a publication date the way the blog displays it
///
/// # Examples
/// ```ignore
/// long_date(&date) // -> "May 4, 2020"
/// ```
pub fn long_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// RFC 3339 timestamp for a publication date, pinned to midnight UTC.
/// Feed readers need a full timestamp even though posts only carry a date.
pub fn atom_timestamp(date: &NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .to_rfc3339()
}

//! Calendar helpers shared by the scheduler, the penalty accumulator and
//! persisted loan records.
//!
//! All dates are plain calendar dates (`NaiveDate`); there is no time or
//! timezone component anywhere in the ledger.

use chrono::{Months, NaiveDate};

/// Storage and display format for dates (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` date, returning `None` for anything unparseable
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Add calendar months, keeping the day of month where it exists.
///
/// When the start day does not exist in the target month (e.g. the 31st
/// landing in a 30-day month) the result is the last day of that month;
/// it never spills into the following month. Returns `None` on overflow.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Signed number of whole days from `from` to `to` (positive when `to` is later)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Serde adapter for optional dates stored as `YYYY-MM-DD` strings.
///
/// Unparseable or missing values deserialize to `None` rather than failing
/// the whole collection load.
pub mod lenient_date {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

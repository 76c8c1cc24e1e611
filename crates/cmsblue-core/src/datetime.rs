//! Date and timestamp reformatting.
//!
//! Exports write dates as `MM/DD/YYYY` and the export timestamp as
//! `MM/DD/YYYY hh:mm AM`. Output uses the compact HL7-style `YYYYMMDD` and
//! `YYYYMMDDhhmmss+0500` forms consumed downstream.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

/// Fixed offset suffix appended to every timestamp.
///
/// Kept for compatibility with existing consumers; it is not derived from
/// any timezone information in the export.
pub const LEGACY_UTC_OFFSET: &str = "+0500";

const DATE_PATTERN: &str = "MM/DD/YYYY";
const TIME_PATTERN: &str = "MM/DD/YYYY hh:mm AM|PM";
const DATE_FORMAT: &str = "%m/%d/%Y";

/// A value that does not match the expected date or timestamp pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' does not match {expected}")]
pub struct DateFormatError {
    pub value: String,
    pub expected: &'static str,
}

impl DateFormatError {
    fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

/// Two-digit month, two-digit day, four-digit year, separated by `/`.
fn has_date_shape(value: &str) -> bool {
    let parts: Vec<&str> = value.split('/').collect();
    match parts.as_slice() {
        [month, day, year] => {
            month.len() == 2
                && day.len() == 2
                && year.len() == 4
                && parts
                    .iter()
                    .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
        }
        _ => false,
    }
}

/// Reformat `MM/DD/YYYY` as `YYYYMMDD`. An empty value stays empty.
pub fn parse_date(raw: &str) -> Result<String, DateFormatError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    if !has_date_shape(value) {
        return Err(DateFormatError::new(value, DATE_PATTERN));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.format("%Y%m%d").to_string())
        .map_err(|_| DateFormatError::new(value, DATE_PATTERN))
}

/// Split `hh:mm AM` (space optional) into a 12-hour clock reading.
fn parse_clock(clock: &str) -> Option<(u32, u32, bool)> {
    let upper = clock.trim().to_ascii_uppercase();
    let (digits, pm) = if let Some(digits) = upper.strip_suffix("PM") {
        (digits, true)
    } else if let Some(digits) = upper.strip_suffix("AM") {
        (digits, false)
    } else {
        return None;
    };
    let (hour, minute) = digits.trim_end().split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    Some((hour, minute, pm))
}

/// Reformat `MM/DD/YYYY hh:mm AM|PM` as `YYYYMMDDhhmmss+0500`.
///
/// The space before the meridiem is optional. The hour is written as it
/// appears on the 12-hour clock, matching the legacy output. An empty value
/// stays empty.
pub fn parse_time(raw: &str) -> Result<String, DateFormatError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    let invalid = || DateFormatError::new(value, TIME_PATTERN);
    let (date_part, clock) = value.split_once(char::is_whitespace).ok_or_else(invalid)?;
    if !has_date_shape(date_part) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| invalid())?;
    let (hour, minute, pm) = parse_clock(clock).ok_or_else(invalid)?;
    let stamp: NaiveDateTime = date
        .and_hms_opt(hour % 12 + if pm { 12 } else { 0 }, minute, 0)
        .ok_or_else(invalid)?;
    let (_, clock_hour) = stamp.hour12();
    Ok(format!(
        "{}{clock_hour:02}{}{LEGACY_UTC_OFFSET}",
        stamp.format("%Y%m%d"),
        stamp.format("%M%S"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates() {
        assert_eq!(parse_date("01/31/1950").as_deref(), Ok("19500131"));
        assert_eq!(parse_date("12/01/1999").as_deref(), Ok("19991201"));
        assert_eq!(parse_date(" 02/29/2016 ").as_deref(), Ok("20160229"));
    }

    #[test]
    fn empty_date_stays_empty() {
        assert_eq!(parse_date("").as_deref(), Ok(""));
        assert_eq!(parse_date("   ").as_deref(), Ok(""));
        assert_eq!(parse_time("").as_deref(), Ok(""));
    }

    #[test]
    fn malformed_dates() {
        for bad in ["1/5/2015", "2015-01-05", "02/30/2015", "13/01/2015", "01/2015", "N/A"] {
            let err = parse_date(bad).expect_err(bad);
            assert_eq!(err.expected, "MM/DD/YYYY");
        }
    }

    #[test]
    fn timestamps() {
        let stamp = parse_time("06/01/2015 01:33PM").expect("timestamp");
        assert!(stamp.starts_with("20150601013300"));
        assert!(stamp.ends_with("+0500"));
        assert_eq!(
            parse_time("06/04/2015 4:54 PM").as_deref(),
            Ok("20150604045400+0500")
        );
        assert_eq!(
            parse_time("12/31/2014 11:05 am").as_deref(),
            Ok("20141231110500+0500")
        );
    }

    #[test]
    fn malformed_timestamps() {
        assert!(parse_time("06/01/2015").is_err());
        assert!(parse_time("06/01/2015 13:33 PM").is_err());
        assert!(parse_time("6/1/2015 1:33 PM").is_err());
        let err = parse_time("yesterday").expect_err("not a timestamp");
        assert_eq!(err.to_string(), "'yesterday' does not match MM/DD/YYYY hh:mm AM|PM");
    }
}

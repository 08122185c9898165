use std::str::FromStr;

use hifitime::{Duration, Epoch};

use crate::{
    constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR},
    syzygy_errors::SyzygyError,
};

/// Parse a UTC date such as `1550-01-01T00:00:00` or `2024-04-10T12:30:45 UTC`.
///
/// A string without an explicit time scale is read as UTC.
///
/// Argument
/// --------
/// * `date`: the date to parse
///
/// Return
/// ------
/// * the corresponding epoch, or [`SyzygyError::InvalidParameters`]
pub fn parse_utc(date: &str) -> Result<Epoch, SyzygyError> {
    let trimmed = date.trim().trim_end_matches('Z');
    let parsed = if trimmed.contains(' ') {
        Epoch::from_str(trimmed)
    } else {
        Epoch::from_str(&format!("{trimmed} UTC"))
    };
    parsed.map_err(|e| SyzygyError::InvalidParameters(format!("invalid date '{date}': {e}")))
}

/// Format an epoch as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_utc(epoch: &Epoch) -> String {
    let (year, month, day, hour, minute, second, _) = epoch.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")
}

/// Convert a number of days into an exact [`Duration`].
pub fn days(value: f64) -> Duration {
    Duration::from_seconds(value * SECONDS_PER_DAY)
}

/// Convert a number of hours into an exact [`Duration`].
pub fn hours(value: f64) -> Duration {
    Duration::from_seconds(value * SECONDS_PER_HOUR)
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_parse_utc() {
        let expected = Epoch::from_gregorian_utc_hms(1550, 1, 1, 0, 0, 0);
        assert_eq!(parse_utc("1550-01-01T00:00:00").unwrap(), expected);
        assert_eq!(parse_utc("1550-01-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_utc("1550-01-01T00:00:00 UTC").unwrap(), expected);
        assert!(parse_utc("not a date").is_err());
    }

    #[test]
    fn test_format_utc() {
        let epoch = Epoch::from_gregorian_utc_hms(2024, 4, 10, 12, 30, 45);
        assert_eq!(format_utc(&epoch), "2024-04-10 12:30:45");

        let epoch = Epoch::from_gregorian_utc_hms(1550, 1, 1, 0, 0, 0);
        assert_eq!(format_utc(&epoch), "1550-01-01 00:00:00");
    }

    #[test]
    fn test_days_and_hours() {
        assert_eq!(days(1.0), hours(24.0));
        assert_eq!(hours(1.5).to_seconds(), 5400.0);
    }
}

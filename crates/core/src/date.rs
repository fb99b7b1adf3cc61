//! Wire date format helpers
//!
//! The backend exchanges local wall-clock timestamps as `YYYY-MM-DD HH:MM:SS`.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Format used for every timestamp sent to the backend
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialize a timestamp in the backend wire format, truncating sub-second precision
pub fn serialize_date(date: &NaiveDateTime) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// Parse a timestamp received from the backend
///
/// Accepts the wire format, the ISO `T` separated form with optional
/// fractional seconds, RFC 3339 (converted to local time), and a bare date
/// (midnight).
pub fn deserialize_date(input: &str) -> CoreResult<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, WIRE_FORMAT) {
        return Ok(date);
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(date);
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Local).naive_local());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(CoreError::invalid_date(input))
}

/// Parse an optional timestamp, treating empty strings as absent
pub fn deserialize_optional_date(input: Option<&str>) -> CoreResult<Option<NaiveDateTime>> {
    match input {
        Some(value) if !value.trim().is_empty() => deserialize_date(value).map(Some),
        _ => Ok(None),
    }
}

/// Calendar date of an instant, independent of the local timezone
pub fn date_only(instant: &DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn serialize_pads_every_field() {
        assert_eq!(serialize_date(&at(2025, 6, 7, 8, 9, 5)), "2025-06-07 08:09:05");
    }

    #[test]
    fn round_trip_preserves_whole_seconds() {
        let samples = [
            at(2025, 1, 1, 0, 0, 0),
            at(2024, 2, 29, 23, 59, 59),
            at(1999, 12, 31, 12, 30, 45),
        ];
        for date in samples {
            assert_eq!(deserialize_date(&serialize_date(&date)).unwrap(), date);
        }
    }

    #[test]
    fn serialize_drops_fractional_seconds() {
        let date = at(2025, 3, 4, 5, 6, 7).with_nanosecond(999_000_000).unwrap();
        let parsed = deserialize_date(&serialize_date(&date)).unwrap();
        assert_eq!(parsed, at(2025, 3, 4, 5, 6, 7));
    }

    #[test]
    fn accepts_iso_and_bare_dates() {
        assert_eq!(
            deserialize_date("2025-06-27T10:00:00.123").unwrap(),
            at(2025, 6, 27, 10, 0, 0).with_nanosecond(123_000_000).unwrap()
        );
        assert_eq!(deserialize_date("2025-06-27").unwrap(), at(2025, 6, 27, 0, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            deserialize_date("next tuesday"),
            Err(CoreError::invalid_date("next tuesday"))
        );
    }

    #[test]
    fn optional_date_treats_blank_as_absent() {
        assert_eq!(deserialize_optional_date(None).unwrap(), None);
        assert_eq!(deserialize_optional_date(Some("")).unwrap(), None);
        assert!(deserialize_optional_date(Some("2025-01-01 00:00:00")).unwrap().is_some());
    }

    #[test]
    fn date_only_uses_utc_calendar_day() {
        let instant = Utc.with_ymd_and_hms(2025, 5, 31, 23, 30, 0).unwrap();
        assert_eq!(date_only(&instant), NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
    }
}

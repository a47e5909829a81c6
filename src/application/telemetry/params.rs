//! Parsing of raw telemetry query parameters

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Query parameters exactly as received; empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct TelemetryParams {
    pub limit: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339 (`Z` or explicit offset), offset-less date-times, which
/// are taken as UTC, and bare dates, which mean midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(super) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(super) fn parse_limit(raw: Option<&str>, default: u64) -> DomainResult<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n as u64),
        _ => Err(DomainError::validation(format!(
            "limit must be a positive integer, got '{}'",
            raw
        ))),
    }
}

pub(super) fn parse_bound(name: &str, raw: Option<&str>) -> DomainResult<Option<DateTime<Utc>>> {
    raw.map(|value| {
        parse_timestamp(value).ok_or_else(|| {
            DomainError::validation(format!("{} is not a valid ISO-8601 timestamp: '{}'", name, value))
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn z_suffix_and_offsets_normalize_to_utc() {
        assert_eq!(parse_timestamp("2024-06-01T10:30:00Z"), Some(utc(10, 30)));
        assert_eq!(parse_timestamp("2024-06-01T07:30:00-03:00"), Some(utc(10, 30)));
        assert_eq!(parse_timestamp("2024-06-01 10:30:00+00:00"), Some(utc(10, 30)));
    }

    #[test]
    fn naive_inputs_are_taken_as_utc() {
        assert_eq!(parse_timestamp("2024-06-01T10:30:00"), Some(utc(10, 30)));
        assert_eq!(parse_timestamp("2024-06-01T10:30"), Some(utc(10, 30)));
        assert_eq!(parse_timestamp("2024-06-01"), Some(utc(0, 0)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
        assert!(parse_bound("start_date", Some("nope")).is_err());
        assert_eq!(parse_bound("start_date", None).unwrap(), None);
    }

    #[test]
    fn limit_must_be_positive_integer() {
        assert_eq!(parse_limit(None, 100).unwrap(), 100);
        assert_eq!(parse_limit(Some("5"), 100).unwrap(), 5);
        for bad in ["0", "-3", "ten", "2.5"] {
            assert!(parse_limit(Some(bad), 100).is_err(), "{bad}");
        }
    }

    #[test]
    fn blank_values_count_as_absent() {
        assert_eq!(non_empty(&Some("  ".into())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(" 3 ".into())), Some("3"));
    }
}

//! Timestamp helpers shared by the record model and the connectors.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Formats a timestamp as `YYYY-MM-DDThh:mm:ss.sssZ`.
pub fn format_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats a timestamp with microsecond precision, for binding query
/// parameters without losing digits the database may store.
pub fn format_micros(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses RFC 3339 or a naive `YYYY-MM-DD hh:mm:ss[.fff]` string, treating
/// naive values as UTC.
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn formats_with_millis_and_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_millis(&ts), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn millis_format_drops_sub_millisecond_digits() {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        assert_eq!(format_millis(&ts), "2024-01-02T03:04:05.123Z");
        assert_eq!(format_micros(&ts), "2024-01-02T03:04:05.123456Z");
    }

    #[test]
    fn parses_offsets_into_utc() {
        let parsed = parse_utc("2024-01-02T05:04:05+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert!(parse_utc("yesterday").is_none());
    }
}

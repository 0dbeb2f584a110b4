use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

/// `created_at` layout used by social-media archive exports,
/// e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Fewest integer digits accepted as Unix seconds (2001-09-09 onwards).
const MIN_EPOCH_DIGITS: usize = 10;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Coerces the timestamp strings found in archive exports into UTC.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Attempt to parse `s` into a UTC [`DateTime`].
    ///
    /// Handles, in order:
    /// * the archive export layout ([`ARCHIVE_TIMESTAMP_FORMAT`]),
    /// * RFC 3339 / ISO 8601 with offset (including a `Z` suffix),
    /// * RFC 2822,
    /// * naive date-time and date-only patterns, read as UTC,
    /// * compact `YYYYMMDD` dates and bare `YYYY` years,
    /// * Unix seconds, integer or fractional, with at least ten integer digits.
    ///
    /// Shorter digit strings are never read as epoch offsets.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_str(s, ARCHIVE_TIMESTAMP_FORMAT) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc));
        }

        const FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];

        for fmt in FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Self::start_of_day(date);
        }

        if let Some(date) = Self::parse_compact_date(s) {
            return Self::start_of_day(date);
        }

        if let Some(dt) = Self::parse_unix_seconds(s) {
            return Some(dt);
        }

        debug!("TimestampProcessor: could not parse timestamp \"{}\"", s);
        None
    }

    fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
        Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
    }

    /// `YYYYMMDD` or `YYYY` (January 1st).
    fn parse_compact_date(s: &str) -> Option<NaiveDate> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match s.len() {
            8 => NaiveDate::from_ymd_opt(
                s[..4].parse().ok()?,
                s[4..6].parse().ok()?,
                s[6..].parse().ok()?,
            ),
            4 => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
            _ => None,
        }
    }

    fn parse_unix_seconds(s: &str) -> Option<DateTime<Utc>> {
        let unsigned = s.strip_prefix('-').unwrap_or(s);
        let int_digits = unsigned.split('.').next().unwrap_or("");
        if int_digits.len() < MIN_EPOCH_DIGITS || !int_digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        if let Ok(secs) = s.parse::<i64>() {
            return DateTime::from_timestamp(secs, 0);
        }
        let f = s.parse::<f64>().ok()?;
        if !f.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis((f * 1000.0).round() as i64)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_archive_format() {
        let dt = TimestampProcessor::parse("Wed Oct 10 20:19:24 +0000 2018").unwrap();
        assert_eq!(dt.year(), 2018);
        assert_eq!(dt.month(), 10);
        assert_eq!(dt.day(), 10);
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn test_parse_archive_format_with_offset_normalises_to_utc() {
        // 23:30 at -0200 is already the next day (and year) in UTC.
        let dt = TimestampProcessor::parse("Mon Dec 31 23:30:00 -0200 2018").unwrap();
        assert_eq!(dt.year(), 2019);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.hour(), 1);
    }

    #[test]
    fn test_parse_rfc3339_with_z() {
        let dt = TimestampProcessor::parse("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = TimestampProcessor::parse("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_rfc2822() {
        let dt = TimestampProcessor::parse("Tue, 1 Jul 2003 10:52:37 +0200").unwrap();
        assert_eq!(dt.year(), 2003);
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_naive_datetime_as_utc() {
        let dt = TimestampProcessor::parse("2022-06-01 12:00:00").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = TimestampProcessor::parse("2022-06-01").unwrap();
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_unix_seconds() {
        let dt = TimestampProcessor::parse("1700000000").unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        let dt = TimestampProcessor::parse("1700000000.5").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_parse_negative_fractional_unix_seconds() {
        let dt = TimestampProcessor::parse("-1700000000.5").unwrap();
        assert_eq!(dt.timestamp_millis(), -1_700_000_000_500);
    }

    #[test]
    fn test_parse_compact_date() {
        let dt = TimestampProcessor::parse("20181010").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2018, 10, 10));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_year_only() {
        let dt = TimestampProcessor::parse("2018").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2018, 1, 1));
    }

    #[test]
    fn test_short_numbers_are_not_epoch_offsets() {
        // None of these may land in 1970.
        assert!(TimestampProcessor::parse("-1.5").is_none());
        assert!(TimestampProcessor::parse("1.5").is_none());
        assert!(TimestampProcessor::parse("201810").is_none());
        assert!(TimestampProcessor::parse("20181340").is_none());
        assert!(TimestampProcessor::parse("123456789").is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimestampProcessor::parse("").is_none());
        assert!(TimestampProcessor::parse("   ").is_none());
        assert!(TimestampProcessor::parse("yesterday-ish").is_none());
        assert!(TimestampProcessor::parse("NaN").is_none());
    }
}

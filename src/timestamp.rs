//! UTC to local date/time conversion at a fixed offset

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Timelike};
use thiserror::Error;

/// Layout of the leading part of an audit creation timestamp
pub const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DATE_FORMAT: &str = "%d-%m-%Y";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Characters of the timestamp that are parsed; fractional seconds and zone suffixes are ignored
const PARSED_PREFIX_CHARS: usize = 19;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("malformed timestamp {input:?}: {source}")]
    Malformed {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("leap second in timestamp {0:?}")]
    LeapSecond(String),

    #[error("UTC offset of {0} hours is out of range")]
    InvalidOffset(i64),
}

/// Derived local date and time strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStamp {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TimestampLocalizer {
    offset: FixedOffset,
}

impl TimestampLocalizer {
    /// Offsets must be strictly within one day either side of UTC
    pub fn new(offset_hours: i64) -> Result<Self, TimestampError> {
        let offset = i32::try_from(offset_hours)
            .ok()
            .and_then(|h| h.checked_mul(3600))
            .and_then(FixedOffset::east_opt)
            .ok_or(TimestampError::InvalidOffset(offset_hours))?;
        Ok(TimestampLocalizer { offset })
    }

    /// Convert a UTC creation timestamp into local date and time strings.
    ///
    /// Calendar arithmetic carries hour overflow into the next day, so
    /// `2023-01-01T14:30:00` at +10 becomes `02-01-2023` / `00:30:00`.
    pub fn localize(&self, utc: &str) -> Result<LocalStamp, TimestampError> {
        let prefix = leading_chars(utc, PARSED_PREFIX_CHARS);
        let naive = NaiveDateTime::parse_from_str(prefix, UTC_FORMAT).map_err(|source| {
            TimestampError::Malformed {
                input: utc.to_string(),
                source,
            }
        })?;
        // chrono represents second 60 as an overflowing nanosecond count
        if naive.nanosecond() >= 1_000_000_000 {
            return Err(TimestampError::LeapSecond(utc.to_string()));
        }

        let local = self.offset.from_utc_datetime(&naive);
        Ok(LocalStamp {
            date: local.format(DATE_FORMAT).to_string(),
            time: local.format(TIME_FORMAT).to_string(),
        })
    }
}

fn leading_chars(s: &str, count: usize) -> &str {
    match s.char_indices().nth(count) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localizer() -> TimestampLocalizer {
        TimestampLocalizer::new(10).unwrap()
    }

    #[test]
    fn test_same_day() {
        let stamp = localizer().localize("2023-01-01T05:00:00").unwrap();
        assert_eq!(stamp.date, "01-01-2023");
        assert_eq!(stamp.time, "15:00:00");
    }

    #[test]
    fn test_rolls_over_to_next_day() {
        let stamp = localizer().localize("2023-01-01T14:30:00").unwrap();
        assert_eq!(stamp.date, "02-01-2023");
        assert_eq!(stamp.time, "00:30:00");
    }

    #[test]
    fn test_rolls_over_year_end() {
        let stamp = localizer().localize("2023-12-31T23:59:59").unwrap();
        assert_eq!(stamp.date, "01-01-2024");
        assert_eq!(stamp.time, "09:59:59");
    }

    #[test]
    fn test_ignores_fraction_and_zone_suffix() {
        let stamp = localizer().localize("2024-02-28T20:15:42.1234567Z").unwrap();
        assert_eq!(stamp.date, "29-02-2024");
        assert_eq!(stamp.time, "06:15:42");
    }

    #[test]
    fn test_negative_offset() {
        let stamp = TimestampLocalizer::new(-5)
            .unwrap()
            .localize("2023-03-01T02:00:00")
            .unwrap();
        assert_eq!(stamp.date, "28-02-2023");
        assert_eq!(stamp.time, "21:00:00");
    }

    #[test]
    fn test_malformed_input() {
        let err = localizer().localize("01/01/2023 10:00").unwrap_err();
        assert!(matches!(err, TimestampError::Malformed { .. }));

        assert!(localizer().localize("2023-01-01").is_err());
        assert!(localizer().localize("2023-13-01T00:00:00").is_err());
    }

    #[test]
    fn test_leap_second_rejected() {
        let err = localizer().localize("2016-12-31T23:59:60").unwrap_err();
        assert!(matches!(err, TimestampError::LeapSecond(_)));
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        assert!(localizer().localize("２０２３-01-01T00:00:00ééééé").is_err());
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(matches!(
            TimestampLocalizer::new(24),
            Err(TimestampError::InvalidOffset(24))
        ));
        assert!(TimestampLocalizer::new(-23).is_ok());
    }
}

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

use crate::error::ScheduleError;

/// Every time of day is anchored onto this date so comparisons never see a calendar.
const REFERENCE_DATE: (i32, u32, u32) = (1899, 12, 31);

/// A wall-clock time with the calendar date stripped away.
///
/// Values are stored as a [`NaiveDateTime`] on a fixed reference date, so two
/// instants with the same hour/minute/second compare equal no matter which day
/// (or which UTC offset) they were taken from. Sub-second precision is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveDateTime);

impl TimeOfDay {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Self(reference_date().and_time(time)))
    }

    /// Canonicalizes an instant using the hour/minute/second of its own offset.
    pub fn normalize<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_naive_time(instant.time())
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        let truncated = time.with_nanosecond(0).unwrap_or(time);
        Self(reference_date().and_time(truncated))
    }

    /// Parses `HH:MM:SS`. Components may be one or two digits but must sit in
    /// the 0-23 / 0-59 / 0-59 ranges.
    pub fn parse(field: &str, raw: &str) -> Result<Self, ScheduleError> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split(':');
        let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ScheduleError::format(field, raw, "expected HH:MM:SS"));
        };

        let hour = parse_component(field, raw, h)?;
        let minute = parse_component(field, raw, m)?;
        let second = parse_component(field, raw, s)?;

        Self::from_hms(hour, minute, second)
            .ok_or_else(|| ScheduleError::format(field, raw, "time component out of range"))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

fn parse_component(field: &str, raw: &str, part: &str) -> Result<u32, ScheduleError> {
    if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScheduleError::format(field, raw, "expected HH:MM:SS"));
    }
    part.parse::<u32>()
        .map_err(|_| ScheduleError::format(field, raw, "expected HH:MM:SS"))
}

fn reference_date() -> NaiveDate {
    let (year, month, day) = REFERENCE_DATE;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    #[test]
    fn same_clock_time_on_different_dates_is_equal() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let a = offset.with_ymd_and_hms(2026, 1, 5, 13, 30, 15).unwrap();
        let b = offset.with_ymd_and_hms(1999, 7, 21, 13, 30, 15).unwrap();

        assert_eq!(TimeOfDay::normalize(&a), TimeOfDay::normalize(&b));
    }

    #[test]
    fn normalization_uses_the_instant_own_offset() {
        let utc = Utc.with_ymd_and_hms(2026, 3, 29, 8, 0, 0).unwrap();
        let west = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 11, 2, 8, 0, 0)
            .unwrap();

        assert_eq!(TimeOfDay::normalize(&utc), TimeOfDay::normalize(&west));
        assert_eq!(TimeOfDay::normalize(&utc), TimeOfDay::from_hms(8, 0, 0).unwrap());
    }

    #[test]
    fn orders_by_time_of_day_only() {
        let late_yesterday = Utc.with_ymd_and_hms(2026, 1, 4, 22, 0, 0).unwrap();
        let early_today = Utc.with_ymd_and_hms(2026, 1, 5, 6, 0, 0).unwrap();

        assert!(TimeOfDay::normalize(&early_today) < TimeOfDay::normalize(&late_yesterday));
    }

    #[test]
    fn drops_subsecond_precision() {
        let time = NaiveTime::from_hms_milli_opt(7, 15, 0, 999).unwrap();
        assert_eq!(
            TimeOfDay::from_naive_time(time),
            TimeOfDay::from_hms(7, 15, 0).unwrap()
        );
    }

    #[test]
    fn parses_clock_strings() {
        assert_eq!(
            TimeOfDay::parse("time1", "08:05:09").unwrap(),
            TimeOfDay::from_hms(8, 5, 9).unwrap()
        );
        assert_eq!(
            TimeOfDay::parse("time1", " 6:0:0 ").unwrap(),
            TimeOfDay::from_hms(6, 0, 0).unwrap()
        );
        assert_eq!(TimeOfDay::parse("time1", "23:59:59").unwrap().to_string(), "23:59:59");
    }

    #[test]
    fn rejects_bad_clock_strings() {
        for raw in ["24:00:00", "12:60:00", "12:00:60", "12:00", "12:00:00:00", "ab:cd:ef", "", "-1:00:00", "123:00:00"] {
            let err = TimeOfDay::parse("time2", raw).unwrap_err();
            assert!(
                matches!(err, ScheduleError::Format { ref field, .. } if field == "time2"),
                "{raw:?} -> {err:?}"
            );
        }
    }
}

//! The span of one calendar day, used to query a calendar source.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// First and last instant of a calendar day in a given timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRange {
    pub date: NaiveDate,
    pub timezone: Tz,
    pub start: DateTime<Utc>,
    /// Last millisecond of the day (inclusive)
    pub end: DateTime<Utc>,
}

impl DayRange {
    pub fn for_date(date: NaiveDate, timezone: Tz) -> Self {
        let start = start_of_day(date, timezone);
        let next = match date.succ_opt() {
            Some(next) => start_of_day(next, timezone),
            None => start + Duration::days(1),
        };

        DayRange {
            date,
            timezone,
            start,
            end: next - Duration::milliseconds(1),
        }
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

/// Local midnight of `date`, or the first valid local time after it when a
/// DST transition skips midnight.
fn start_of_day(date: NaiveDate, timezone: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    for hour in 0..24 {
        let candidate = midnight + Duration::hours(hour);
        match timezone.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => continue,
        }
    }

    // No zone skips a whole day's worth of hours from midnight
    midnight.and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_day_range_in_tokyo() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 28).unwrap();
        let range = DayRange::for_date(date, chrono_tz::Asia::Tokyo);

        assert_eq!(range.start_rfc3339(), "2025-10-27T15:00:00+00:00");
        assert_eq!(range.end_rfc3339(), "2025-10-28T14:59:59.999+00:00");
    }

    #[test]
    fn test_day_range_in_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let range = DayRange::for_date(date, chrono_tz::UTC);

        assert_eq!(range.start.date_naive(), date);
        assert_eq!(range.start.hour(), 0);
        assert_eq!(range.end.date_naive(), date);
        assert_eq!(range.end.hour(), 23);
    }

    #[test]
    fn test_day_range_when_dst_skips_midnight() {
        // Santiago springs forward at 00:00 local on 2024-09-08
        let date = NaiveDate::from_ymd_opt(2024, 9, 8).unwrap();
        let range = DayRange::for_date(date, chrono_tz::America::Santiago);

        let local_start = range.start.with_timezone(&chrono_tz::America::Santiago);
        assert_eq!(local_start.date_naive(), date);
        assert_eq!(local_start.hour(), 1);
    }
}

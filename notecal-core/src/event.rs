//! Provider-neutral calendar event.
//!
//! Calendar sources convert their API responses into this type; the
//! template renderer reads it and never mutates it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event as fetched for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// For all-day events this is the first day's boundary (UTC midnight)
    pub start_time: DateTime<Utc>,
    /// For all-day events this is the exclusive end day's boundary
    pub end_time: DateTime<Utc>,
    pub is_all_day: bool,
    /// Attendee email addresses
    #[serde(default)]
    pub attendees: Vec<String>,
    /// Link to the event in the calendar's web UI
    pub html_link: Option<String>,
}

impl CalendarEvent {
    /// A timed event with no optional fields set.
    pub fn timed(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        CalendarEvent {
            id: id.into(),
            title: title.into(),
            description: None,
            location: None,
            start_time,
            end_time,
            is_all_day: false,
            attendees: Vec::new(),
            html_link: None,
        }
    }

    /// An all-day event spanning `start..end` (end exclusive, as calendars report it).
    pub fn all_day(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        CalendarEvent {
            is_all_day: true,
            ..CalendarEvent::timed(id, title, day_boundary(start), day_boundary(end))
        }
    }
}

fn day_boundary(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

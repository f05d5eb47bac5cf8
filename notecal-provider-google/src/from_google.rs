use chrono::{DateTime, NaiveTime, Utc};
use notecal_core::CalendarEvent;
use notecal_core::constants::UNTITLED_EVENT;

use crate::types::{EventDateTime, GoogleEvent};

pub trait FromGoogle {
    fn from_google(event: GoogleEvent) -> Result<Self, &'static str>
    where
        Self: Sized;
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: GoogleEvent) -> Result<Self, &'static str> {
        let start = event.start.as_ref().ok_or("Event has no start time")?;
        let end = event.end.as_ref().ok_or("Event has no end time")?;

        let is_all_day = start.date.is_some();
        let start_time = to_instant(start).ok_or("Event has no start time")?;
        let end_time = to_instant(end).ok_or("Event has no end time")?;

        let title = match event.summary {
            Some(summary) if !summary.trim().is_empty() => summary,
            _ => UNTITLED_EVENT.to_string(),
        };

        let attendees = event
            .attendees
            .into_iter()
            .filter_map(|a| a.email)
            .filter(|email| !email.is_empty())
            .collect();

        Ok(CalendarEvent {
            id: event.id,
            title,
            description: non_empty(event.description),
            location: non_empty(event.location),
            start_time,
            end_time,
            is_all_day,
            attendees,
            html_link: non_empty(event.html_link),
        })
    }
}

/// All-day boundaries become UTC midnight of the date.
fn to_instant(time: &EventDateTime) -> Option<DateTime<Utc>> {
    if let Some(date) = time.date {
        Some(date.and_time(NaiveTime::MIN).and_utc())
    } else {
        time.date_time.map(|dt| dt.with_timezone(&Utc))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

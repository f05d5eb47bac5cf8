//! Importing a day's events into a daily note.
//!
//! `EventImporter` runs the whole pipeline: date from the note path, events
//! from a [`CalendarSource`] for that day, rendered text into a
//! [`NoteEditor`]. The source and the editor are supplied by the caller.

use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::date_range::DayRange;
use crate::error::NotecalResult;
use crate::event::CalendarEvent;
use crate::path_date::extract_date_from_file;
use crate::settings::Settings;
use crate::template::render_events;

/// Something that can list the events of one day.
pub trait CalendarSource {
    /// Events overlapping `day`, in chronological order.
    fn events_for_date(
        &self,
        calendar_id: &str,
        day: &DayRange,
    ) -> impl Future<Output = NotecalResult<Vec<CalendarEvent>>> + Send;
}

/// Where rendered text ends up.
pub trait NoteEditor {
    /// Insert `text` at the cursor, replacing any selection.
    fn replace_selection(&mut self, text: &str) -> NotecalResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub date: NaiveDate,
    /// Events returned by the calendar source
    pub retrieved: usize,
    /// Events that produced a line of output
    pub rendered: usize,
    pub text: String,
}

pub struct EventImporter<S> {
    source: S,
}

impl<S: CalendarSource> EventImporter<S> {
    pub fn new(source: S) -> Self {
        EventImporter { source }
    }

    /// Import the events of the day named by `note_path` into `editor`.
    ///
    /// Nothing is inserted when the day has no events.
    pub async fn import<E: NoteEditor>(
        &self,
        editor: &mut E,
        note_path: &str,
        settings: &Settings,
        daily_notes_format: Option<&str>,
    ) -> NotecalResult<ImportReport> {
        info!(note_path, "Starting event import");

        let extracted =
            extract_date_from_file(note_path, settings.path_format(), daily_notes_format)?;
        let day = extracted.day_range(settings.timezone);
        info!(date = %day.date, calendar_id = %settings.calendar_id, "Fetching events");

        let events = self
            .source
            .events_for_date(&settings.calendar_id, &day)
            .await?;

        if events.is_empty() {
            info!("No events found for the date");
            return Ok(ImportReport {
                date: extracted.date,
                retrieved: 0,
                rendered: 0,
                text: String::new(),
            });
        }

        debug!(count = events.len(), "Formatting events");
        let outcome = render_events(&events, &settings.templates, settings.timezone)?;

        editor.replace_selection(&outcome.text)?;
        info!(rendered = outcome.rendered, skipped = outcome.skipped, "Events inserted");

        Ok(ImportReport {
            date: extracted.date,
            retrieved: events.len(),
            rendered: outcome.rendered,
            text: outcome.text,
        })
    }
}

use std::time::Duration;

use notecal_core::date_range::DayRange;
use notecal_core::error::{BoxError, NotecalError, NotecalResult};
use notecal_core::import::CalendarSource;
use notecal_core::CalendarEvent;
use notecal_core::constants::MAX_EVENTS;
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

use crate::from_google::FromGoogle;
use crate::types::{ErrorResponse, EventList};

pub const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only Calendar v3 client authenticated with a bearer token.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
    max_results: u32,
}

impl GoogleCalendarClient {
    pub fn new(access_token: impl Into<String>) -> NotecalResult<Self> {
        Self::with_base_url(access_token, GOOGLE_API_BASE_URL)
    }

    /// Point the client at another API root (used by tests).
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> NotecalResult<Self> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(NotecalError::Authentication {
                message: "No access token configured".into(),
                source: None,
            });
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotecalError::unexpected("Failed to build HTTP client", e))?;

        Ok(GoogleCalendarClient {
            http,
            access_token,
            base_url: base_url.into(),
            max_results: MAX_EVENTS,
        })
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    fn events_url(&self, calendar_id: &str) -> NotecalResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| NotecalError::unexpected(format!("Invalid API URL {}", self.base_url), e))?;

        url.path_segments_mut()
            .map_err(|_| NotecalError::Unexpected {
                message: format!("API URL {} cannot have a path", self.base_url),
                source: None,
            })?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);

        Ok(url)
    }

    /// Fetch the day's events, expanded into single instances and ordered by start.
    pub async fn fetch_events(
        &self,
        calendar_id: &str,
        day: &DayRange,
    ) -> NotecalResult<Vec<CalendarEvent>> {
        let url = self.events_url(calendar_id)?;
        info!(calendar_id, date = %day.date, "Fetching events");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", day.start_rfc3339()),
                ("timeMax", day.end_rfc3339()),
                ("maxResults", self.max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body, calendar_id));
        }

        let list: EventList = response
            .json()
            .await
            .map_err(|e| NotecalError::unexpected("Failed to parse events response", e))?;

        let mut events = Vec::with_capacity(list.items.len());
        for item in list.items {
            if item.status == "cancelled" || item.id.is_empty() {
                continue;
            }
            let id = item.id.clone();
            match CalendarEvent::from_google(item) {
                Ok(event) => events.push(event),
                Err(reason) => warn!(event_id = %id, reason, "Skipping event"),
            }
        }

        info!(count = events.len(), "Retrieved events");
        Ok(events)
    }
}

impl CalendarSource for GoogleCalendarClient {
    async fn events_for_date(
        &self,
        calendar_id: &str,
        day: &DayRange,
    ) -> NotecalResult<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, day).await
    }
}

fn map_transport_error(error: reqwest::Error) -> NotecalError {
    if error.is_connect() || error.is_timeout() {
        NotecalError::Network {
            message: error.to_string(),
            source: Some(error.into()),
        }
    } else {
        NotecalError::unexpected("Request to Google Calendar failed", error)
    }
}

fn map_status_error(status: StatusCode, body: &str, calendar_id: &str) -> NotecalError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|r| r.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());
    debug!(%status, %message, "Google Calendar API error");

    let source: Option<BoxError> = Some(format!("HTTP {status}: {message}").into());

    match status {
        StatusCode::UNAUTHORIZED => NotecalError::Authentication { message, source },
        StatusCode::FORBIDDEN => NotecalError::Authorization { message, source },
        StatusCode::NOT_FOUND => NotecalError::CalendarNotFound {
            calendar_id: calendar_id.to_string(),
            source,
        },
        StatusCode::TOO_MANY_REQUESTS => NotecalError::ApiQuota { message, source },
        _ => NotecalError::Unexpected { message, source },
    }
}

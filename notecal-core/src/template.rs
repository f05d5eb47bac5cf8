//! Event template rendering.
//!
//! Templates use `{{name}}` placeholders and are substituted literally:
//! nothing is ever escaped, so `&`, `/`, `<` and `>` in event fields come
//! out exactly as they went in. There are no sections, partials or other
//! logic; such tags are rejected as malformed.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{DEFAULT_ALL_DAY_EVENT_TEMPLATE, DEFAULT_NORMAL_EVENT_TEMPLATE};
use crate::error::NotecalResult;
use crate::event::CalendarEvent;

/// Per-kind templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSet {
    #[serde(default = "default_normal_event")]
    pub normal_event: String,
    #[serde(default = "default_all_day_event")]
    pub all_day_event: String,
}

fn default_normal_event() -> String {
    DEFAULT_NORMAL_EVENT_TEMPLATE.to_string()
}

fn default_all_day_event() -> String {
    DEFAULT_ALL_DAY_EVENT_TEMPLATE.to_string()
}

impl Default for TemplateSet {
    fn default() -> Self {
        TemplateSet {
            normal_event: default_normal_event(),
            all_day_event: default_all_day_event(),
        }
    }
}

impl TemplateSet {
    pub fn for_event(&self, event: &CalendarEvent) -> &str {
        if event.is_all_day {
            &self.all_day_event
        } else {
            &self.normal_event
        }
    }
}

/// Values available to a template for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateData {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub location: String,
    pub attendees: String,
    pub html_link: String,
}

impl TemplateData {
    pub fn from_event(event: &CalendarEvent, timezone: Tz) -> Self {
        let clock = |t: &chrono::DateTime<chrono::Utc>| {
            if event.is_all_day {
                String::new()
            } else {
                t.with_timezone(&timezone).format("%H:%M").to_string()
            }
        };

        TemplateData {
            title: event.title.clone(),
            start_time: clock(&event.start_time),
            end_time: clock(&event.end_time),
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone().unwrap_or_default(),
            attendees: event.attendees.join(", "),
            html_link: event.html_link.clone().unwrap_or_default(),
        }
    }

    /// Look up a placeholder by its template name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "title" => &self.title,
            "startTime" => &self.start_time,
            "endTime" => &self.end_time,
            "description" => &self.description,
            "location" => &self.location,
            "attendees" => &self.attendees,
            "htmlLink" => &self.html_link,
            _ => return None,
        };
        Some(value)
    }
}

/// A template that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateSyntaxError {
    #[error("unclosed tag starting at byte {0}")]
    Unclosed(usize),

    #[error("empty tag at byte {0}")]
    EmptyTag(usize),

    #[error("unsupported tag '{tag}' at byte {offset}")]
    Unsupported { tag: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part<'a> {
    Text(&'a str),
    Var(&'a str),
}

/// A parsed template borrowing from its source string.
#[derive(Debug, Clone)]
pub struct Template<'a> {
    parts: Vec<Part<'a>>,
}

impl<'a> Template<'a> {
    pub fn parse(source: &'a str) -> Result<Self, TemplateSyntaxError> {
        let mut parts = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                parts.push(Part::Text(&rest[..open]));
            }
            let tag_offset = offset + open;
            let after_open = &rest[open + 2..];

            // {{{name}}} is the unescaped form elsewhere; here it is the same as {{name}}
            let (inner, consumed) = if let Some(body) = after_open.strip_prefix('{') {
                let close = body
                    .find("}}}")
                    .ok_or(TemplateSyntaxError::Unclosed(tag_offset))?;
                (&body[..close], 3 + close + 3)
            } else {
                let close = after_open
                    .find("}}")
                    .ok_or(TemplateSyntaxError::Unclosed(tag_offset))?;
                (&after_open[..close], 2 + close + 2)
            };

            if let Some(part) = parse_tag(inner, tag_offset)? {
                parts.push(part);
            }

            rest = &rest[open + consumed..];
            offset += open + consumed;
        }

        if !rest.is_empty() {
            parts.push(Part::Text(rest));
        }

        Ok(Template { parts })
    }

    /// Substitute `data`; unknown names become empty strings.
    pub fn render(&self, data: &TemplateData) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Var(name) => out.push_str(data.get(name).unwrap_or_default()),
            }
        }
        out
    }
}

fn parse_tag(inner: &str, offset: usize) -> Result<Option<Part<'_>>, TemplateSyntaxError> {
    let tag = inner.trim();

    let name = match tag.chars().next() {
        None => return Err(TemplateSyntaxError::EmptyTag(offset)),
        Some('!') => return Ok(None),
        Some('&') => tag[1..].trim(),
        Some('#' | '^' | '/' | '>' | '=' | '{' | '}') => {
            return Err(TemplateSyntaxError::Unsupported {
                tag: tag.to_string(),
                offset,
            });
        }
        Some(_) => tag,
    };

    if name.is_empty() {
        return Err(TemplateSyntaxError::EmptyTag(offset));
    }
    Ok(Some(Part::Var(name)))
}

/// The templates of one batch, each kind parsed on first use. A kind that
/// never occurs is never parsed.
struct ParsedTemplates<'a> {
    templates: &'a TemplateSet,
    normal_event: Option<Template<'a>>,
    all_day_event: Option<Template<'a>>,
}

impl<'a> ParsedTemplates<'a> {
    fn new(templates: &'a TemplateSet) -> Self {
        ParsedTemplates {
            templates,
            normal_event: None,
            all_day_event: None,
        }
    }

    fn for_event(&mut self, event: &CalendarEvent) -> Result<&Template<'a>, TemplateSyntaxError> {
        let templates: &'a TemplateSet = self.templates;
        let slot = if event.is_all_day {
            &mut self.all_day_event
        } else {
            &mut self.normal_event
        };

        let template = match slot.take() {
            Some(template) => template,
            None => Template::parse(templates.for_event(event))?,
        };
        Ok(slot.insert(template))
    }

    #[cfg(test)]
    fn parsed_kinds(&self) -> (bool, bool) {
        (self.normal_event.is_some(), self.all_day_event.is_some())
    }
}

/// Result of rendering a batch of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    pub text: String,
    pub rendered: usize,
    /// Events whose template was blank
    pub skipped: usize,
}

/// Render `events` in order, one template fragment each, joined by newlines.
///
/// Events whose template is blank are skipped without error.
pub fn render_events(
    events: &[CalendarEvent],
    templates: &TemplateSet,
    timezone: Tz,
) -> NotecalResult<RenderOutcome> {
    let mut outcome = RenderOutcome::default();
    if events.is_empty() {
        return Ok(outcome);
    }

    let mut parsed = ParsedTemplates::new(templates);
    let mut lines = Vec::with_capacity(events.len());
    for event in events {
        let source = templates.for_event(event);
        if source.trim().is_empty() {
            debug!(event_id = %event.id, all_day = event.is_all_day, "Skipping event with blank template");
            outcome.skipped += 1;
            continue;
        }

        let template = parsed.for_event(event).inspect_err(|e| {
            warn!(event_id = %event.id, error = %e, "Template rendering failed");
        })?;
        lines.push(template.render(&TemplateData::from_event(event, timezone)));
    }

    outcome.rendered = lines.len();
    outcome.text = lines.join("\n");
    Ok(outcome)
}

/// Render `events` to the text that gets inserted into the note.
pub fn render(events: &[CalendarEvent], templates: &TemplateSet, timezone: Tz) -> NotecalResult<String> {
    render_events(events, templates, timezone).map(|outcome| outcome.text)
}

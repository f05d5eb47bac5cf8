//! Shared defaults.

/// Path format used when neither the caller nor the daily-notes config provide one.
pub const DEFAULT_PATH_FORMAT: &str = "YYYY-MM-DD";

/// Extension stripped from note paths before matching.
pub const NOTE_EXTENSION: &str = ".md";

pub const DEFAULT_NORMAL_EVENT_TEMPLATE: &str = "- {{startTime}}-{{endTime}}: {{title}}";
pub const DEFAULT_ALL_DAY_EVENT_TEMPLATE: &str = "- [All day] {{title}}";

/// Upper bound on events requested for a single day.
pub const MAX_EVENTS: u32 = 100;

/// Title used for events that come back without a summary.
pub const UNTITLED_EVENT: &str = "(No title)";

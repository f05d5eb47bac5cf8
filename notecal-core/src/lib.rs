//! Core types for notecal.
//!
//! This crate holds everything between "here is a note path" and "here is
//! the text to insert into it":
//! - `path_date` derives a calendar date from a daily-note path
//! - `template` renders calendar events through per-kind templates
//! - `import` wires both around a calendar source and a note editor
//!
//! Providers and front-ends depend on this crate and implement the
//! collaborator traits in `import`.

pub mod constants;
pub mod daily_notes;
pub mod date_range;
pub mod error;
pub mod event;
pub mod import;
pub mod path_date;
pub mod settings;
pub mod template;
pub mod validators;

pub use error::{ErrorCode, NotecalError, NotecalResult};
pub use event::CalendarEvent;

//! Google Calendar event source for notecal.
//!
//! Lists a single day's events through the Calendar v3 REST API using a
//! bearer access token. Obtaining that token is left to the user.

mod client;
mod from_google;
mod types;

pub use client::{GoogleCalendarClient, GOOGLE_API_BASE_URL};

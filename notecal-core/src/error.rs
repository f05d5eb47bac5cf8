//! Error types for notecal.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::path_date::DateParseFailure;
use crate::template::TemplateSyntaxError;

/// Boxed underlying failure kept for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stable, machine-readable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NetworkError,
    AuthenticationError,
    AuthorizationError,
    ApiQuotaError,
    InvalidDateFormat,
    InvalidSettings,
    CalendarNotFound,
    NoActiveFile,
    NotDailyNote,
    TemplateError,
    UnexpectedError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::AuthenticationError => "AUTHENTICATION_ERROR",
            ErrorCode::AuthorizationError => "AUTHORIZATION_ERROR",
            ErrorCode::ApiQuotaError => "API_QUOTA_ERROR",
            ErrorCode::InvalidDateFormat => "INVALID_DATE_FORMAT",
            ErrorCode::InvalidSettings => "INVALID_SETTINGS",
            ErrorCode::CalendarNotFound => "CALENDAR_NOT_FOUND",
            ErrorCode::NoActiveFile => "NO_ACTIVE_FILE",
            ErrorCode::NotDailyNote => "NOT_DAILY_NOTE",
            ErrorCode::TemplateError => "TEMPLATE_ERROR",
            ErrorCode::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }

    /// Short advice shown to the user for this kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "Check your network connection",
            ErrorCode::AuthenticationError => "Check your Google access token",
            ErrorCode::AuthorizationError => "You do not have access to this calendar",
            ErrorCode::ApiQuotaError => "API quota reached, wait a moment and try again",
            ErrorCode::InvalidDateFormat => "The daily note's date format is invalid",
            ErrorCode::InvalidSettings => "Settings are invalid, check your config file",
            ErrorCode::CalendarNotFound => "The configured calendar was not found",
            ErrorCode::NoActiveFile => "Open a note first",
            ErrorCode::NotDailyNote => "This is not a daily note",
            ErrorCode::TemplateError => "A template is malformed",
            ErrorCode::UnexpectedError => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in notecal operations.
#[derive(Error, Debug)]
pub enum NotecalError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Access forbidden: {message}")]
    Authorization {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("API quota exceeded: {message}")]
    ApiQuota {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Failed to parse date from file path '{path}' with format '{format}'")]
    InvalidDateFormat {
        path: String,
        format: String,
        #[source]
        reason: DateParseFailure,
    },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Calendar not found: {calendar_id}")]
    CalendarNotFound {
        calendar_id: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("No note file at {0}")]
    NoActiveFile(String),

    #[error("Not a daily note: {0}")]
    NotDailyNote(String),

    #[error("Template rendering failed")]
    Template(#[from] TemplateSyntaxError),

    #[error("Unexpected error: {message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl NotecalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            NotecalError::Network { .. } => ErrorCode::NetworkError,
            NotecalError::Authentication { .. } => ErrorCode::AuthenticationError,
            NotecalError::Authorization { .. } => ErrorCode::AuthorizationError,
            NotecalError::ApiQuota { .. } => ErrorCode::ApiQuotaError,
            NotecalError::InvalidDateFormat { .. } => ErrorCode::InvalidDateFormat,
            NotecalError::InvalidSettings(_) => ErrorCode::InvalidSettings,
            NotecalError::CalendarNotFound { .. } => ErrorCode::CalendarNotFound,
            NotecalError::NoActiveFile(_) => ErrorCode::NoActiveFile,
            NotecalError::NotDailyNote(_) => ErrorCode::NotDailyNote,
            NotecalError::Template(_) => ErrorCode::TemplateError,
            NotecalError::Unexpected { .. } => ErrorCode::UnexpectedError,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.code().user_message()
    }

    pub fn unexpected(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        NotecalError::Unexpected {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Result type alias for notecal operations.
pub type NotecalResult<T> = Result<T, NotecalError>;

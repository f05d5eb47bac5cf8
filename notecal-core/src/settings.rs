//! User settings.
//!
//! Read from `~/.config/notecal/config.toml`, with `NOTECAL_*` environment
//! variables layered on top (e.g. `NOTECAL_ACCESS_TOKEN`).

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::constants::MAX_EVENTS;
use crate::error::{NotecalError, NotecalResult};
use crate::template::TemplateSet;
use crate::validators::{validate_calendar_id, validate_template_syntax};

fn default_timezone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(chrono_tz::UTC)
}

fn default_max_events() -> u32 {
    MAX_EVENTS
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Google API bearer token
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub calendar_id: String,

    /// IANA timezone used to display event times and to bound the day
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Path format for daily notes; blank defers to the vault's daily-notes config
    #[serde(default)]
    pub daily_note_path_format: String,

    #[serde(default = "default_max_events")]
    pub max_events: u32,

    #[serde(default)]
    pub templates: TemplateSet,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            access_token: String::new(),
            calendar_id: String::new(),
            timezone: default_timezone(),
            daily_note_path_format: String::new(),
            max_events: default_max_events(),
            templates: TemplateSet::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> NotecalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                NotecalError::InvalidSettings("Could not determine config directory".into())
            })?
            .join("notecal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the config file and environment, creating a
    /// commented default file on first use.
    pub fn load() -> NotecalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        let config = Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("NOTECAL"))
            .build()
            .map_err(|e| NotecalError::InvalidSettings(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| NotecalError::InvalidSettings(e.to_string()))
    }

    /// Load settings from a single TOML file, ignoring the environment.
    pub fn load_from(path: &Path) -> NotecalResult<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()
            .map_err(|e| NotecalError::InvalidSettings(e.to_string()))?
            .try_deserialize()
            .map_err(|e| NotecalError::InvalidSettings(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> NotecalResult<()> {
        let defaults = TemplateSet::default();
        let contents = format!(
            "\
# notecal configuration

# Calendar to import from (the account address for your primary calendar):
# calendar_id = \"you@example.com\"

# Google API access token (or set NOTECAL_ACCESS_TOKEN):
# access_token = \"ya29....\"

# Timezone used to show event times (defaults to the system timezone):
# timezone = \"Asia/Tokyo\"

# Daily note path format; leave unset to use the vault's daily-notes format:
# daily_note_path_format = \"YYYY/MM/YYYY-MM-DD\"

# max_events = {}

# [templates]
# normal_event = {:?}
# all_day_event = {:?}
",
            MAX_EVENTS, defaults.normal_event, defaults.all_day_event
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NotecalError::InvalidSettings(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents).map_err(|e| {
            NotecalError::InvalidSettings(format!("Could not write config file: {e}"))
        })?;

        debug!(path = %path.display(), "Created default config");
        Ok(())
    }

    /// Check that the settings are usable for an import.
    pub fn validate(&self) -> NotecalResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(NotecalError::InvalidSettings(
                "access_token is not set (config file or NOTECAL_ACCESS_TOKEN)".into(),
            ));
        }

        if !validate_calendar_id(&self.calendar_id) {
            return Err(NotecalError::InvalidSettings(format!(
                "calendar_id '{}' is not a calendar address",
                self.calendar_id
            )));
        }

        // A blank template turns that kind of event off
        for (kind, template) in [
            ("normal_event", &self.templates.normal_event),
            ("all_day_event", &self.templates.all_day_event),
        ] {
            if !template.trim().is_empty() && !validate_template_syntax(template) {
                return Err(NotecalError::InvalidSettings(format!(
                    "templates.{kind} is malformed: {template}"
                )));
            }
        }

        if self.max_events == 0 {
            return Err(NotecalError::InvalidSettings("max_events must be at least 1".into()));
        }

        Ok(())
    }

    /// The configured path format, if not blank.
    pub fn path_format(&self) -> Option<&str> {
        let format = self.daily_note_path_format.trim();
        (!format.is_empty()).then_some(format)
    }
}

//! The vault's daily-notes configuration.
//!
//! Note-taking apps that follow the Obsidian layout keep the daily-notes
//! settings in `<vault>/.obsidian/daily-notes.json`:
//!
//! ```json
//! { "format": "YYYY/MM/YYYY-MM-DD", "folder": "Journal" }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{NotecalError, NotecalResult};

const DAILY_NOTES_CONFIG: &str = ".obsidian/daily-notes.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DailyNotesConfig {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub folder: String,
}

impl DailyNotesConfig {
    pub fn config_path(vault_root: &Path) -> PathBuf {
        vault_root.join(DAILY_NOTES_CONFIG)
    }

    /// Read the vault's daily-notes config. A vault without one yields `None`.
    pub fn load(vault_root: &Path) -> NotecalResult<Option<Self>> {
        let path = Self::config_path(vault_root);

        if !path.exists() {
            debug!(path = %path.display(), "No daily-notes config in vault");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            NotecalError::InvalidSettings(format!("Could not read {}: {e}", path.display()))
        })?;

        let config: DailyNotesConfig = serde_json::from_str(&contents).map_err(|e| {
            NotecalError::InvalidSettings(format!("Could not parse {}: {e}", path.display()))
        })?;

        Ok(Some(config))
    }

    /// The configured format, if it is not blank.
    pub fn format(&self) -> Option<&str> {
        let format = self.format.trim();
        (!format.is_empty()).then_some(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(vault: &Path, contents: &str) {
        let path = DailyNotesConfig::config_path(vault);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_missing_config_is_none() {
        let vault = tempfile::tempdir().unwrap();
        assert_eq!(DailyNotesConfig::load(vault.path()).unwrap(), None);
    }

    #[test]
    fn test_reads_format_and_folder() {
        let vault = tempfile::tempdir().unwrap();
        write_config(vault.path(), r#"{"format": "YYYY/MM/YYYY-MM-DD", "folder": "Journal"}"#);

        let config = DailyNotesConfig::load(vault.path()).unwrap().unwrap();

        assert_eq!(config.format(), Some("YYYY/MM/YYYY-MM-DD"));
        assert_eq!(config.folder, "Journal");
    }

    #[test]
    fn test_blank_format_is_none() {
        let vault = tempfile::tempdir().unwrap();
        write_config(vault.path(), r#"{"format": "", "folder": ""}"#);

        let config = DailyNotesConfig::load(vault.path()).unwrap().unwrap();
        assert_eq!(config.format(), None);
    }

    #[test]
    fn test_missing_keys_default() {
        let vault = tempfile::tempdir().unwrap();
        write_config(vault.path(), "{}");

        let config = DailyNotesConfig::load(vault.path()).unwrap().unwrap();
        assert_eq!(config, DailyNotesConfig::default());
    }

    #[test]
    fn test_corrupt_config_is_invalid_settings() {
        let vault = tempfile::tempdir().unwrap();
        write_config(vault.path(), "{ not json");

        let err = DailyNotesConfig::load(vault.path()).unwrap_err();
        assert!(matches!(err, NotecalError::InvalidSettings(_)));
    }
}

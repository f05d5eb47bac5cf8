use std::path::{Component, Path, PathBuf};

use notecal_core::constants::NOTE_EXTENSION;
use notecal_core::daily_notes::DailyNotesConfig;
use notecal_core::error::{NotecalError, NotecalResult};
use notecal_core::path_date::{FormatSource, resolve_format};
use tracing::debug;

/// A notes directory, identified by its root.
pub struct Vault {
    root: PathBuf,
}

/// A note inside a vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLocation {
    pub absolute: PathBuf,
    /// Path from the vault root, `/`-separated, extension included
    pub vault_path: String,
}

impl Vault {
    /// Open the vault at `root`, or the current directory.
    pub fn open(root: Option<&Path>) -> NotecalResult<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()
                .map_err(|e| NotecalError::unexpected("Could not read current directory", e))?,
        };

        let root = root.canonicalize().map_err(|e| {
            NotecalError::InvalidSettings(format!("Vault {} is not accessible: {e}", root.display()))
        })?;

        debug!(root = %root.display(), "Opened vault");
        Ok(Vault { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The vault's daily-notes settings, if it has any.
    pub fn daily_notes(&self) -> NotecalResult<Option<DailyNotesConfig>> {
        DailyNotesConfig::load(&self.root)
    }

    /// Find `note` (absolute, or relative to the vault root).
    pub fn locate(&self, note: &Path) -> NotecalResult<NoteLocation> {
        let candidate = if note.is_absolute() {
            note.to_path_buf()
        } else {
            self.root.join(note)
        };

        if !candidate.is_file() {
            return Err(NotecalError::NoActiveFile(candidate.display().to_string()));
        }

        let absolute = candidate.canonicalize().map_err(|e| {
            NotecalError::unexpected(format!("Could not resolve {}", candidate.display()), e)
        })?;

        let relative = absolute
            .strip_prefix(&self.root)
            .map_err(|_| NotecalError::NotDailyNote(format!("{} is outside the vault", note.display())))?;

        let vault_path = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        if !vault_path.ends_with(NOTE_EXTENSION) {
            return Err(NotecalError::NotDailyNote(format!("{vault_path} is not a markdown note")));
        }

        Ok(NoteLocation {
            absolute,
            vault_path,
        })
    }
}

impl NoteLocation {
    /// The path a date is read from. Daily-notes formats are relative to the
    /// daily-notes folder, so that folder is dropped when its format is used.
    pub fn date_path(
        &self,
        explicit_format: Option<&str>,
        daily_notes: Option<&DailyNotesConfig>,
    ) -> &str {
        let daily_notes_format = daily_notes.and_then(DailyNotesConfig::format);
        let (_, source) = resolve_format(explicit_format, daily_notes_format);
        if source != FormatSource::DailyNotes {
            return &self.vault_path;
        }

        let folder = daily_notes
            .map(|config| config.folder.trim_matches('/'))
            .unwrap_or_default();
        if folder.is_empty() {
            return &self.vault_path;
        }

        self.vault_path
            .strip_prefix(folder)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.vault_path)
    }
}

use std::fs;
use std::path::PathBuf;

use notecal_core::error::{NotecalError, NotecalResult};
use notecal_core::import::NoteEditor;
use tracing::debug;

/// A note on disk. Text goes in before line `line` (0-based), or at the end.
pub struct NoteFile {
    path: PathBuf,
    line: Option<usize>,
}

impl NoteFile {
    pub fn new(path: impl Into<PathBuf>, line: Option<usize>) -> Self {
        NoteFile {
            path: path.into(),
            line,
        }
    }
}

impl NoteEditor for NoteFile {
    fn replace_selection(&mut self, text: &str) -> NotecalResult<()> {
        if text.is_empty() {
            return Ok(());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            NotecalError::unexpected(format!("Could not read {}", self.path.display()), e)
        })?;

        let updated = insert_text(&contents, text, self.line);

        fs::write(&self.path, updated).map_err(|e| {
            NotecalError::unexpected(format!("Could not write {}", self.path.display()), e)
        })?;

        debug!(path = %self.path.display(), line = ?self.line, "Wrote events to note");
        Ok(())
    }
}

/// Leaves the note untouched (`--dry-run`).
pub struct DryRun;

impl NoteEditor for DryRun {
    fn replace_selection(&mut self, text: &str) -> NotecalResult<()> {
        debug!(bytes = text.len(), "Dry run, note not modified");
        Ok(())
    }
}

/// Insert `text` as whole lines at the start of line `line`. A missing or
/// out-of-range line appends.
fn insert_text(contents: &str, text: &str, line: Option<usize>) -> String {
    let offset = match line {
        Some(n) => contents.split_inclusive('\n').take(n).map(str::len).sum(),
        None => contents.len(),
    };
    let (before, after) = contents.split_at(offset);

    let mut out = String::with_capacity(contents.len() + text.len() + 2);
    out.push_str(before);
    if !before.is_empty() && !before.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(after);
    out
}

use std::path::Path;

use anyhow::Result;
use notecal_core::daily_notes::DailyNotesConfig;
use notecal_core::path_date::{FormatSource, extract_date_from_file, resolve_format};
use notecal_core::settings::Settings;
use owo_colors::OwoColorize;

use crate::vault::Vault;

pub fn run(note: &Path, vault: Option<&Path>, format_override: Option<&str>) -> Result<()> {
    let settings = Settings::load()?;
    let explicit = format_override.or(settings.path_format());

    let vault = Vault::open(vault)?;
    let note = vault.locate(note)?;
    let daily_notes = vault.daily_notes()?;
    let daily_notes_format = daily_notes.as_ref().and_then(DailyNotesConfig::format);

    let (format_used, source) = resolve_format(explicit, daily_notes_format);
    let date_path = note.date_path(explicit, daily_notes.as_ref());
    let extracted = extract_date_from_file(date_path, explicit, daily_notes_format)?;
    let day = extracted.day_range(settings.timezone);

    println!("{}", extracted.date.format("%Y-%m-%d (%A)").bold());
    println!("  Vault:   {}", vault.root().display());
    println!("  Note:    {}", note.vault_path);
    println!(
        "  Format:  {} {}",
        format_used,
        format!("({})", source_label(source)).dimmed()
    );
    println!("  Day:     {} to {}", day.start_rfc3339(), day.end_rfc3339());

    Ok(())
}

fn source_label(source: FormatSource) -> &'static str {
    match source {
        FormatSource::Explicit => "configured",
        FormatSource::DailyNotes => "daily-notes settings",
        FormatSource::Default => "default",
    }
}

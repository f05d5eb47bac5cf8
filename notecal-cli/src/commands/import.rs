use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono_tz::Tz;
use notecal_core::daily_notes::DailyNotesConfig;
use notecal_core::error::{NotecalError, NotecalResult};
use notecal_core::import::{EventImporter, ImportReport};
use notecal_core::settings::Settings;
use notecal_provider_google::GoogleCalendarClient;
use tracing::error;

use crate::note::{DryRun, NoteFile};
use crate::notify::{Notifier, TerminalNotifier};
use crate::vault::Vault;

pub struct ImportArgs {
    pub note: PathBuf,
    pub vault: Option<PathBuf>,
    pub format: Option<String>,
    pub line: Option<usize>,
    pub calendar: Option<String>,
    pub timezone: Option<Tz>,
    pub dry_run: bool,
}

/// Run one import. Failures are reported through the notifier and the log,
/// and turn into a failing exit code rather than an error.
pub async fn run(args: ImportArgs) -> Result<ExitCode> {
    let mut notifier = TerminalNotifier::new();

    match import(&args, &mut notifier).await {
        Ok(report) => {
            report_outcome(&report, &mut notifier);
            if args.dry_run && !report.text.is_empty() {
                println!("{}", report.text);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report_failure(&e, &mut notifier);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_outcome(report: &ImportReport, notifier: &mut impl Notifier) {
    if report.retrieved == 0 {
        notifier.warning(&format!("No events found for {}", report.date));
    } else if report.rendered == 0 {
        notifier.warning(&format!(
            "Nothing inserted: all {} events for {} have a blank template",
            report.retrieved, report.date
        ));
    } else {
        notifier.import_success(report.rendered);
    }
}

/// The notifier gets the advice for the error's code; the log gets the details.
fn report_failure(error: &NotecalError, notifier: &mut impl Notifier) {
    error!(code = %error.code(), "{error}");
    notifier.error_from_code(error.code());
}

async fn import(args: &ImportArgs, notifier: &mut impl Notifier) -> NotecalResult<ImportReport> {
    let mut settings = Settings::load()?;
    if let Some(format) = &args.format {
        settings.daily_note_path_format = format.clone();
    }
    if let Some(calendar) = &args.calendar {
        settings.calendar_id = calendar.clone();
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    settings.validate()?;

    let vault = Vault::open(args.vault.as_deref())?;
    let note = vault.locate(&args.note)?;
    let daily_notes = vault.daily_notes()?;
    let daily_notes_format = daily_notes.as_ref().and_then(DailyNotesConfig::format);
    let date_path = note.date_path(settings.path_format(), daily_notes.as_ref());

    let client =
        GoogleCalendarClient::new(settings.access_token.as_str())?.max_results(settings.max_events);
    let importer = EventImporter::new(client);

    notifier.import_started();
    if args.dry_run {
        importer
            .import(&mut DryRun, date_path, &settings, daily_notes_format)
            .await
    } else {
        let mut editor = NoteFile::new(&note.absolute, args.line);
        importer
            .import(&mut editor, date_path, &settings, daily_notes_format)
            .await
    }
}

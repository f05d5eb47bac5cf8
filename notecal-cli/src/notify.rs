//! User-facing notifications for the import command.

use indicatif::ProgressBar;
use notecal_core::ErrorCode;
use owo_colors::OwoColorize;

use crate::utils::tui::create_spinner;

pub trait Notifier {
    fn import_started(&mut self);
    fn import_success(&mut self, count: usize);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);

    fn error_from_code(&mut self, code: ErrorCode) {
        self.error(code.user_message());
    }
}

/// Writes notifications to stderr, with a spinner while events are fetched.
#[derive(Default)]
pub struct TerminalNotifier {
    spinner: Option<ProgressBar>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Notifier for TerminalNotifier {
    fn import_started(&mut self) {
        self.clear_spinner();
        self.spinner = Some(create_spinner("Fetching events"));
    }

    fn import_success(&mut self, count: usize) {
        self.clear_spinner();
        eprintln!("{} {}", "✓".green(), import_summary(count));
    }

    fn warning(&mut self, message: &str) {
        self.clear_spinner();
        eprintln!("{} {}", "!".yellow(), message.yellow());
    }

    fn error(&mut self, message: &str) {
        self.clear_spinner();
        eprintln!("{} {}", "✗".red(), message.red());
    }
}

fn import_summary(count: usize) -> String {
    if count == 1 {
        "Imported 1 event".to_string()
    } else {
        format!("Imported {count} events")
    }
}

/// Records notifications as plain strings.
#[cfg(test)]
#[derive(Default)]
pub struct Recorder(pub Vec<String>);

#[cfg(test)]
impl Notifier for Recorder {
    fn import_started(&mut self) {
        self.0.push("started".into());
    }
    fn import_success(&mut self, count: usize) {
        self.0.push(format!("success {count}"));
    }
    fn warning(&mut self, message: &str) {
        self.0.push(format!("warning {message}"));
    }
    fn error(&mut self, message: &str) {
        self.0.push(format!("error {message}"));
    }
}

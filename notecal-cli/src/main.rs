mod commands;
mod note;
mod notify;
mod utils;
mod vault;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::import::ImportArgs;

#[derive(Parser)]
#[command(name = "notecal")]
#[command(about = "Import the day's calendar events into a daily note")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the events of the note's day into the note
    Import {
        /// Daily note, relative to the vault or absolute
        note: PathBuf,

        /// Vault root (defaults to the current directory)
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Path format for this run, e.g. "YYYY/MM/YYYY-MM-DD"
        #[arg(short, long)]
        format: Option<String>,

        /// Insert before this line (0-based) instead of appending
        #[arg(short, long)]
        line: Option<usize>,

        /// Calendar id for this run
        #[arg(short, long)]
        calendar: Option<String>,

        /// Timezone for this run, e.g. "Asia/Tokyo"
        #[arg(long, value_parser = parse_timezone)]
        timezone: Option<Tz>,

        /// Print the events instead of writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the date a note's path encodes
    Date {
        note: PathBuf,

        #[arg(long)]
        vault: Option<PathBuf>,

        #[arg(short, long)]
        format: Option<String>,
    },
    /// Show the config file path and check the settings
    Config,
}

fn parse_timezone(value: &str) -> Result<Tz, String> {
    value.parse::<Tz>().map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("NOTECAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Import {
            note,
            vault,
            format,
            line,
            calendar,
            timezone,
            dry_run,
        } => {
            commands::import::run(ImportArgs {
                note,
                vault,
                format,
                line,
                calendar,
                timezone,
                dry_run,
            })
            .await
        }
        Commands::Date {
            note,
            vault,
            format,
        } => commands::date::run(&note, vault.as_deref(), format.as_deref())
            .map(|()| ExitCode::SUCCESS),
        Commands::Config => commands::config::run().map(|()| ExitCode::SUCCESS),
    }
}

//! api-files CLI - Export the competition database to the public JSON tree
//!
//! # Commands
//!
//! ```bash
//! api-files events-list --database db-2024 --year 2024   # <year>/events/events.json
//! api-files event --database db-2024 --event-id 7        # <year>/events/<ref>.json
//! api-files event-races --database db-2024 --event-id 7  # event + published races
//! api-files race --database db-2024 --race-ref 2024-lisboa-swim
//! api-files serve                                        # Preview server (port 3000)
//! ```
//!
//! Paths come from `API_FILES_START_FOLDER`, `DATABASE_DIR` and
//! `INDEX_HTML_PATH` (or a `.env` file) unless given as flags.

use api_files::{
    logs::{log_error, LOGGER},
    start_server, Config, CsvRecordStore, ExportSummary, Exporter, LocalFileStore, Overrides,
    RecordId,
};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "api-files")]
#[command(about = "Export competition database ranges to api-files JSON artifacts", long_about = None)]
struct Cli {
    /// Root of the workbook CSV exports (overrides DATABASE_DIR)
    #[arg(long, global = true)]
    database_dir: Option<PathBuf>,

    /// Root of the api-files tree (overrides API_FILES_START_FOLDER)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// File copied as index.html into new folders (overrides INDEX_HTML_PATH)
    #[arg(long, global = true)]
    index_html: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the events list of a year
    EventsList {
        /// Database workbook id
        #[arg(short, long)]
        database: String,

        /// Year folder (default: current year)
        #[arg(short, long)]
        year: Option<String>,
    },

    /// Write one event
    Event {
        /// Database workbook id
        #[arg(short, long)]
        database: String,

        /// Event id
        #[arg(short, long)]
        event_id: String,
    },

    /// Write one event and all of its published races
    EventRaces {
        /// Database workbook id
        #[arg(short, long)]
        database: String,

        /// Event id
        #[arg(short, long)]
        event_id: String,
    },

    /// Write one race with its results
    Race {
        /// Database workbook id
        #[arg(short, long)]
        database: String,

        /// Race reference
        #[arg(short, long)]
        race_ref: String,
    },

    /// Start the preview server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);

    let overrides = Overrides {
        start_folder: cli.output_dir,
        database_dir: cli.database_dir,
        index_html: cli.index_html,
    };

    let result = match cli.command {
        Commands::EventsList { database, year } => {
            let year = year.unwrap_or_else(|| Utc::now().year().to_string());
            run(overrides, |exporter| exporter.events_list(&database, &year))
        }

        Commands::Event { database, event_id } => match parse_event_id(&event_id) {
            Ok(id) => run(overrides, |exporter| exporter.event(&database, &id)),
            Err(e) => Err(e),
        },

        Commands::EventRaces { database, event_id } => match parse_event_id(&event_id) {
            Ok(id) => run(overrides, |exporter| exporter.event_with_races(&database, &id)),
            Err(e) => Err(e),
        },

        Commands::Race { database, race_ref } => {
            run(overrides, |exporter| exporter.race(&database, &race_ref))
        }

        Commands::Serve { port } => cmd_serve(overrides.start_folder, port).await,
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

type Cmd = Exporter<CsvRecordStore, LocalFileStore>;

fn parse_event_id(raw: &str) -> Result<RecordId, Box<dyn std::error::Error>> {
    RecordId::parse(raw).ok_or_else(|| "Event id must not be blank".into())
}

fn run<C>(overrides: Overrides, command: C) -> Result<(), Box<dyn std::error::Error>>
where
    C: FnOnce(&Cmd) -> api_files::ExportResult<ExportSummary>,
{
    let config = Config::from_env(overrides)?;
    let exporter = Exporter::new(
        CsvRecordStore::new(&config.database_dir),
        LocalFileStore::new(&config.start_folder).with_index_html(config.index_html),
    );

    let summary = command(&exporter)?;

    eprintln!();
    for path in &summary.written {
        eprintln!("   💾 {}", path.display());
    }
    let warnings = LOGGER.warnings();
    if !warnings.is_empty() {
        eprintln!("\n⚠️  {} warning(s):", warnings.len());
        for warning in &warnings {
            eprintln!("   - {}", warning);
        }
    }
    eprintln!("✅ Done: {} file(s) written", summary.written.len());

    Ok(())
}

async fn cmd_serve(start_folder: Option<PathBuf>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let root = Config::start_folder_from_env(start_folder)?;
    start_server(root, port).await
}

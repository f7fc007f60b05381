//! `roster` command-line entry point.
//!
//! # Responsibility
//! - Parse options, start logging, open the roster database.
//! - Dispatch one user intent into `roster_core` and print the outcome.

mod commands;
mod config;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use log::{info, warn};
use roster_core::db::open_db;
use roster_core::export::DEFAULT_EXPORT_FILE;
use roster_core::roster::DEFAULT_ROSTER_FILE;
use roster_core::{
    init_logging, load_roster_file, AnnotationStore, Creator, SortMode, SqliteKvRepository,
    StatusFilter, ViewQuery,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Track outreach status and notes for a creator roster")]
struct Cli {
    /// Directory holding the roster database and logs.
    #[arg(long, env = "ROSTER_DATA_DIR", default_value = ".roster", global = true)]
    data_dir: PathBuf,
    /// Newline-separated handle list.
    #[arg(long = "roster", env = "ROSTER_FILE", default_value = DEFAULT_ROSTER_FILE, global = true)]
    roster_file: PathBuf,
    /// trace|debug|info|warn|error
    #[arg(long, env = "ROSTER_LOG_LEVEL", global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the filtered, sorted roster with summary counts.
    List {
        #[arg(long, default_value = "")]
        search: String,
        /// all|uncontacted|contacted|joined|not_fit
        #[arg(long, default_value = "all")]
        filter: String,
        /// none|alpha|alpha_desc|updated
        #[arg(long, default_value = "none")]
        sort: String,
    },
    /// Show one creator's annotation.
    Show { handle: String },
    /// Set a creator's status.
    Status { handle: String, status: String },
    /// Replace a creator's note.
    Note { handle: String, text: String },
    /// Export the full roster as CSV.
    Export {
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        out: PathBuf,
    },
    /// Clear every note and status.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::resolve(&cli.data_dir, &cli.roster_file, cli.log_level.as_deref())?;

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory `{}`",
            config.data_dir.display()
        )
    })?;
    init_logging(&config.log_level, &config.log_dir).map_err(|err| anyhow!(err))?;
    info!(
        "event=cli_start module=cli status=ok core_version={} db={}",
        roster_core::core_version(),
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let mut store = AnnotationStore::load(SqliteKvRepository::new(&conn));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::List {
            search,
            filter,
            sort,
        } => {
            let query = ViewQuery {
                search,
                filter: StatusFilter::parse(&filter),
                sort: SortMode::parse(&sort),
            };
            if let StatusFilter::Unrecognized(value) = &query.filter {
                warn!("event=view_query module=cli status=degraded reason=unknown_filter value={value}");
            }
            commands::list(&mut out, &load_roster(&config)?, &store, &query)
        }
        Command::Show { handle } => commands::show(&mut out, &store, &handle),
        Command::Status { handle, status } => {
            commands::set_status(&mut out, &load_roster(&config)?, &mut store, &handle, &status)
        }
        Command::Note { handle, text } => {
            commands::set_note(&mut out, &load_roster(&config)?, &mut store, &handle, &text)
        }
        Command::Export { out: path } => {
            commands::export(&mut out, &load_roster(&config)?, &store, &path)
        }
        Command::Reset { yes } => {
            let stdin = std::io::stdin();
            commands::reset(&mut out, &mut stdin.lock(), &mut store, yes)
        }
    }
}

fn load_roster(config: &CliConfig) -> Result<Vec<Creator>> {
    load_roster_file(&config.roster_path).context("could not load the creator roster")
}

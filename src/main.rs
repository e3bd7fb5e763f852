use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use course_notes::{
    client::summarizer_from_config,
    config::{Config, log_path},
    notes::NoteWriter,
    rename::{RenameReport, rename_all, rename_all_levels},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt::time::FormatTime};

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Config file, defaults to <config dir>/course-notes/course-notes.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize every folder name under the root.
    Rename {
        /// Defaults to the configured vault.
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Apply the Course / Module / Section names to the top levels.
    RenameLevels {
        /// Defaults to the configured vault.
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Summarize transcripts into markdown notes.
    Notes {
        #[arg(long)]
        transcripts: Option<PathBuf>,
        #[arg(long)]
        vault: Option<PathBuf>,
    },
}

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

pub fn init_logger() -> Result<WorkerGuard> {
    let log_file = log_path();
    let dir = log_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = log_file
        .file_name()
        .context("log path has no file name")?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    #[cfg(debug_assertions)]
    let level = "trace";

    #[cfg(not(debug_assertions))]
    let level = "info";

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(guard)
}

fn print_report(report: &RenameReport) {
    for outcome in &report.outcomes {
        println!("{outcome}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logger()?;
    let args = Args::parse();
    tracing::info!("Starting course-notes: {:?}", args.command);

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match args.command {
        Command::Rename { root } => {
            let root = match root {
                Some(root) => root,
                None => config.vault()?.to_path_buf(),
            };
            print_report(&rename_all(&root)?);
        }
        Command::RenameLevels { root } => {
            let root = match root {
                Some(root) => root,
                None => config.vault()?.to_path_buf(),
            };
            print_report(&rename_all_levels(&root, &config.levels)?);
        }
        Command::Notes { transcripts, vault } => {
            let mut config = config;
            if transcripts.is_some() {
                config.paths.transcripts = transcripts;
            }
            if vault.is_some() {
                config.paths.vault = vault;
            }

            let writer = NoteWriter::from_config(&config)?;
            let summarizer = summarizer_from_config(&config.generator);
            let report = writer.process_all(summarizer.as_ref()).await?;

            for path in &report.written {
                println!("Saved summary to {}", path.display());
            }
            for (path, reason) in &report.failed {
                println!("Error processing '{}': {}", path.display(), reason);
            }
        }
    }

    Ok(())
}

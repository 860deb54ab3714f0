mod cli;
mod server;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use octolog::config::OctologConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "octolog", version, about = "Personal activity journal with semantic retrieval and AI reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Record one activity entry
    Ingest {
        /// Free-form activity text (overrides the sample flags)
        #[arg(long)]
        text: Option<String>,
        /// Active window title; repeat for several windows
        #[arg(long = "window")]
        windows: Vec<String>,
        /// Keyboard tick count for the sample
        #[arg(long, default_value_t = 0)]
        keys: u64,
        /// Mouse tick count for the sample
        #[arg(long, default_value_t = 0)]
        mouse: u64,
        /// Local time "YYYY-MM-DD HH:MM:SS" (defaults to now)
        #[arg(long)]
        timestamp: Option<String>,
        /// Screenshot to describe and attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Retrieve entries by similarity or in time order
    Search {
        /// Text to rank by; omit for chronological order
        query: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Generate a report for a time range
    Report {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Also save the report under the report directory
        #[arg(long)]
        save: bool,
    },
    /// Ask a question about recorded activity
    Ask { question: String },
    /// Show store statistics
    Stats {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the whole store as JSON to stdout
    Export,
    /// Show one entry in full
    Inspect { id: String },
    /// Check the store for inconsistencies
    Doctor {
        /// Print the health report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = OctologConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Ingest {
            text,
            windows,
            keys,
            mouse,
            timestamp,
            image,
        } => {
            let input = match text {
                Some(text) => cli::ingest::IngestInput::Text(text),
                None => cli::ingest::IngestInput::Sample(octolog::journal::types::ActivitySample {
                    active_windows: windows,
                    keyboard_ticks: keys,
                    mouse_ticks: mouse,
                }),
            };
            cli::ingest::ingest(&config, input, timestamp, image.as_deref()).await?;
        }
        Command::Search {
            query,
            start,
            end,
            limit,
        } => {
            cli::search::search(
                &config,
                query.as_deref(),
                start.as_deref(),
                end.as_deref(),
                limit,
            )
            .await?;
        }
        Command::Report { start, end, save } => {
            cli::report::report(&config, &start, &end, save).await?;
        }
        Command::Ask { question } => cli::report::ask(&config, &question).await?,
        Command::Stats { json } => cli::stats::stats(&config, json)?,
        Command::Export => cli::export::export(&config)?,
        Command::Inspect { id } => cli::inspect::inspect(&config, &id)?,
        Command::Doctor { json } => cli::doctor::doctor(&config, json)?,
    }

    Ok(())
}

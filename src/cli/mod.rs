pub mod doctor;
pub mod export;
pub mod ingest;
pub mod inspect;
pub mod report;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};
use octolog::config::OctologConfig;
use octolog::journal::Journal;
use octolog::store::EntryStore;

/// Open the configured store without wiring any providers.
fn open_store(config: &OctologConfig) -> Result<EntryStore> {
    let db_path = config.resolved_db_path();
    EntryStore::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))
}

fn open_journal(config: &OctologConfig) -> Result<Journal> {
    Journal::from_config(config).context("failed to set up journal")
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max {
        format!("{}...", line.chars().take(max).collect::<String>())
    } else {
        line.to_string()
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

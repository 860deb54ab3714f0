use std::path::Path;

use anyhow::Result;
use octolog::config::OctologConfig;
use octolog::journal::timestamp::now_timestamp;
use octolog::journal::types::ActivitySample;

pub enum IngestInput {
    Text(String),
    Sample(ActivitySample),
}

/// Record a single entry from the terminal.
pub async fn ingest(
    config: &OctologConfig,
    input: IngestInput,
    timestamp: Option<String>,
    image: Option<&Path>,
) -> Result<()> {
    let journal = super::open_journal(config)?;
    let timestamp = timestamp.unwrap_or_else(now_timestamp);

    let outcome = match input {
        IngestInput::Text(text) => journal.ingest(&text, &timestamp, image).await?,
        IngestInput::Sample(sample) => journal.ingest_sample(&sample, &timestamp, image).await?,
    };

    println!(
        "{} {} (embedded: {}, screen analysis: {})",
        if outcome.replaced { "Replaced" } else { "Stored" },
        outcome.id,
        if outcome.embedded { "yes" } else { "no" },
        if outcome.described { "yes" } else { "no" },
    );
    Ok(())
}

//! CLI `inspect` command: display one entry in full.

use anyhow::{bail, Result};
use octolog::config::OctologConfig;

/// Inspect a single entry by id and display full details.
pub fn inspect(config: &OctologConfig, id: &str) -> Result<()> {
    let store = super::open_store(config)?;

    let Some(entry) = store.get(id)? else {
        bail!("entry not found: {id}");
    };

    println!("Entry: {id}");
    println!("{}", "=".repeat(50));
    println!("  Timestamp:      {} ({})", entry.metadata.timestamp_str, entry.metadata.timestamp);
    if !entry.metadata.screenshot_path.is_empty() {
        println!("  Screenshot:     {}", entry.metadata.screenshot_path);
    }
    match entry.embedding {
        Some(ref embedding) => println!("  Embedding:      {} dimensions", embedding.len()),
        None => println!("  Embedding:      (none)"),
    }
    println!();
    println!("Text:");
    for line in entry.text.lines() {
        println!("  {line}");
    }

    Ok(())
}

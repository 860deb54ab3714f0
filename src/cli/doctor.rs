//! CLI `doctor` command: check the store and print a health report.

use anyhow::{Context, Result};
use octolog::config::OctologConfig;
use octolog::store::health::check_store_health;

/// Run store diagnostics and print a health report.
pub fn doctor(config: &OctologConfig, json: bool) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Store: not found at {}", db_path.display());
        println!("Run `octolog ingest` or `octolog serve` to start recording.");
        return Ok(());
    }

    let store = super::open_store(config)?;
    let entries = store
        .load()
        .context("failed to load store (may be corrupt)")?;

    let report = check_store_health(&entries);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Octolog Health Report");
    println!("=====================");
    println!();
    println!("Store:             {}", db_path.display());
    println!("File size:         {}", super::format_bytes(store.size_bytes()));
    println!("Entries:           {}", report.entry_count);
    println!("With embedding:    {}", report.embedded_count);
    println!();
    println!("Providers:");
    println!("  Kind:            {}", config.providers.kind);
    println!("  Embedding model: {}", config.providers.embedding_model);

    match report.dimensions.len() {
        0 => println!("  Dimensions:      (no embeddings)"),
        1 => {
            let dims = report.dimensions.iter().next().copied().unwrap_or_default();
            println!("  Dimensions:      {dims} (consistent)");
        }
        _ => {
            let dims: Vec<String> = report.dimensions.iter().map(usize::to_string).collect();
            println!(
                "  WARNING: mixed dimensions {}; similarity only compares the common prefix.",
                dims.join(", ")
            );
        }
    }
    println!();

    if !report.mismatched_ids.is_empty() {
        println!("Ids not derived from their timestamp_str:");
        for id in &report.mismatched_ids {
            println!("  {id}");
        }
        println!();
    }
    if !report.inconsistent_timestamps.is_empty() {
        println!("Entries whose timestamp disagrees with timestamp_str:");
        for id in &report.inconsistent_timestamps {
            println!("  {id}");
        }
        println!();
    }

    if report.is_healthy() {
        println!("Consistency check: PASSED");
    } else {
        println!("Consistency check: FAILED");
        println!();
        println!("Recovery steps:");
        println!("  1. Back up the store: octolog export > backup.json");
        println!("  2. Re-ingest the affected entries with their original timestamps.");
    }

    Ok(())
}

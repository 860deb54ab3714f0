use anyhow::Result;
use octolog::config::OctologConfig;
use octolog::journal::stats::journal_stats;

/// Display store statistics in the terminal.
pub fn stats(config: &OctologConfig, json: bool) -> Result<()> {
    let store = super::open_store(config)?;
    let entries = store.load()?;

    let response = journal_stats(&entries, store.size_bytes());

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Journal Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total entries:       {}", response.total_entries);
    println!("  With embedding:      {}", response.embedded_entries);
    println!("  Without embedding:   {}", response.unembedded_entries);
    println!("  With screenshot:     {}", response.with_screenshot);
    println!();

    if response.embedding_dimensions.is_empty() {
        println!("Embedding dimensions:  (none)");
    } else {
        let dims: Vec<String> = response
            .embedding_dimensions
            .iter()
            .map(usize::to_string)
            .collect();
        println!("Embedding dimensions:  {}", dims.join(", "));
    }
    println!("Store size:            {}", super::format_bytes(response.store_size_bytes));

    if let Some(ref oldest) = response.oldest_entry {
        println!("Oldest entry:          {oldest}");
    }
    if let Some(ref newest) = response.newest_entry {
        println!("Newest entry:          {newest}");
    }

    Ok(())
}

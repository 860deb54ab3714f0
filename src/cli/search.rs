use anyhow::Result;
use octolog::config::OctologConfig;

/// Run a retrieval from the terminal.
pub async fn search(
    config: &OctologConfig,
    query: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let journal = super::open_journal(config)?;
    let limit = limit.unwrap_or(config.retrieval.default_limit);

    let retrieval = journal.retrieve(query, start, end, limit).await?;

    if retrieval.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    println!(
        "Found {} result(s) ({} order)\n",
        retrieval.len(),
        retrieval.mode
    );

    for (i, entry) in retrieval.entries.iter().enumerate() {
        match entry.score {
            Some(score) => println!(
                "  {}. {} [{}] (score: {:.4})",
                i + 1,
                entry.metadata.timestamp_str,
                entry.id,
                score
            ),
            None => println!("  {}. {} [{}]", i + 1, entry.metadata.timestamp_str, entry.id),
        }
        println!("     {}", super::preview(&entry.text, 120));
        println!();
    }

    Ok(())
}

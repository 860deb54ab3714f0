use anyhow::Result;
use octolog::config::OctologConfig;

/// Export the whole store as JSON to stdout, in its persisted shape.
pub fn export(config: &OctologConfig) -> Result<()> {
    let store = super::open_store(config)?;
    let entries = store.load()?;

    println!("{}", serde_json::to_string_pretty(&entries)?);
    eprintln!("Exported {} entries", entries.len());
    Ok(())
}

use anyhow::Result;
use octolog::config::OctologConfig;

/// Generate a report and print it to stdout, optionally saving it.
pub async fn report(config: &OctologConfig, start: &str, end: &str, save: bool) -> Result<()> {
    let journal = super::open_journal(config)?;

    let report = journal.generate_report(start, end).await?;
    println!("{}", report.body);

    if save {
        let path = journal.save_report(&report).await?;
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

/// Answer a question from recorded activity.
pub async fn ask(config: &OctologConfig, question: &str) -> Result<()> {
    let journal = super::open_journal(config)?;
    let answer = journal.ask(question).await?;
    println!("{answer}");
    Ok(())
}

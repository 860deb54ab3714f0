use octolog::config::OctologConfig;
use octolog::journal::types::RetrievalMode;
use octolog::journal::Journal;
use tempfile::TempDir;

fn default_config_in(dir: &TempDir) -> OctologConfig {
    let mut config = OctologConfig::default();
    config.storage.db_path = dir.path().join("db.json").to_string_lossy().into_owned();
    config.storage.report_dir = dir.path().join("reports").to_string_lossy().into_owned();
    config
}

#[tokio::test]
async fn default_config_without_api_key_still_records_and_lists() {
    std::env::remove_var("OPENAI_API_KEY");
    let tmp = TempDir::new().unwrap();
    let config = default_config_in(&tmp);
    assert_eq!(config.providers.kind, "openai");
    assert!(config.providers.api_key.is_none());

    let journal = Journal::from_config(&config).unwrap();

    let outcome = journal
        .ingest("ACTIVE_WINDOWS: Terminal", "2026-02-26 14:00:00", None)
        .await
        .unwrap();
    assert!(!outcome.embedded);

    let result = journal
        .retrieve(Some("what was I doing"), None, None, 10)
        .await
        .unwrap();
    assert_eq!(result.mode, RetrievalMode::Chronological);
    assert_eq!(result.len(), 1);
    assert!(result.entries[0].text.contains("ACTIVE_WINDOWS: Terminal"));
}

#[tokio::test]
async fn default_config_without_api_key_fails_reports_cleanly() {
    std::env::remove_var("OPENAI_API_KEY");
    let tmp = TempDir::new().unwrap();
    let journal = Journal::from_config(&default_config_in(&tmp)).unwrap();

    let err = journal
        .generate_report("2026-02-26 09:00:00", "2026-02-26 17:00:00")
        .await
        .unwrap_err();
    assert!(err.is_provider_failure());
}

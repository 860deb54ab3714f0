//! Core journal engine: ingestion, retrieval, and report assembly.
//!
//! [`Journal`] ties an [`EntryStore`] to the optional AI collaborators. Every
//! provider call goes through [`Journal::with_timeout`], so a hung provider is
//! just another provider failure.

pub mod ingest;
pub mod queue;
pub mod report;
pub mod retrieve;
pub mod stats;
pub mod timestamp;
pub mod types;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::OctologConfig;
use crate::providers::Providers;
use crate::store::EntryStore;

/// Tunables the journal reads at call time.
#[derive(Debug, Clone)]
pub struct JournalSettings {
    pub provider_timeout: Duration,
    pub embed_on_ingest: bool,
    pub default_limit: usize,
    pub report_limit: usize,
    pub report_language: String,
    pub report_dir: PathBuf,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(60),
            embed_on_ingest: true,
            default_limit: 10,
            report_limit: 10,
            report_language: "English".into(),
            report_dir: PathBuf::from("reports"),
        }
    }
}

impl JournalSettings {
    pub fn from_config(config: &OctologConfig) -> Self {
        Self {
            provider_timeout: Duration::from_secs(config.providers.timeout_secs),
            embed_on_ingest: config.providers.embed_on_ingest,
            default_limit: config.retrieval.default_limit,
            report_limit: config.report.context_limit,
            report_language: config.report.language.clone(),
            report_dir: config.resolved_report_dir(),
        }
    }
}

pub struct Journal {
    store: Arc<EntryStore>,
    providers: Providers,
    settings: JournalSettings,
}

impl Journal {
    pub fn new(store: Arc<EntryStore>, providers: Providers, settings: JournalSettings) -> Self {
        Self {
            store,
            providers,
            settings,
        }
    }

    /// Open the configured store and wire the configured providers.
    pub fn from_config(config: &OctologConfig) -> anyhow::Result<Self> {
        let store = EntryStore::open(config.resolved_db_path())?;
        let providers = crate::providers::create_providers(&config.providers)?;
        Ok(Self::new(
            Arc::new(store),
            providers,
            JournalSettings::from_config(config),
        ))
    }

    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    pub fn settings(&self) -> &JournalSettings {
        &self.settings
    }

    /// Run a provider call under the configured timeout, folding a timeout
    /// into an ordinary provider error.
    async fn with_timeout<T>(
        &self,
        what: &str,
        call: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        match tokio::time::timeout(self.settings.provider_timeout, call).await {
            Ok(result) => result,
            Err(_) => anyhow::bail!(
                "{what} timed out after {}s",
                self.settings.provider_timeout.as_secs_f64()
            ),
        }
    }
}

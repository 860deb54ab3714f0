//! Write path: screen analysis, embedding, and commit.
//!
//! [`Journal::ingest`] is the single entry point. Provider failures on this
//! path are logged and degrade the entry (no description, no embedding); only
//! bad timestamps and store failures are returned to the caller.

use std::path::Path;
use std::sync::Arc;

use crate::error::JournalResult;
use crate::journal::timestamp::parse_timestamp;
use crate::journal::types::{ActivitySample, Entry, EntryMetadata, IngestOutcome};
use crate::journal::Journal;

pub const SCREEN_ANALYSIS_MARKER: &str = "SCREEN ANALYSIS:";
/// Screen analysis value when no description is available.
pub const NO_ANALYSIS: &str = "N/A";

/// Derive the store key for a timestamp: `"2026-02-26 14:00:00"` becomes
/// `"entry_2026-02-26_14-00-00"`.
pub fn entry_id(timestamp: &str) -> String {
    format!("entry_{}", timestamp.replace(' ', "_").replace(':', "-"))
}

/// Append the screen analysis line to the activity facts.
pub fn compose_text(text: &str, analysis: Option<&str>) -> String {
    format!(
        "{text}\n{SCREEN_ANALYSIS_MARKER} {}",
        analysis.unwrap_or(NO_ANALYSIS)
    )
}

impl Journal {
    /// Build an entry from activity text and commit it.
    ///
    /// Re-ingesting the same timestamp overwrites the earlier entry.
    pub async fn ingest(
        &self,
        text: &str,
        timestamp: &str,
        image_path: Option<&Path>,
    ) -> JournalResult<IngestOutcome> {
        let epoch = parse_timestamp(timestamp)?;
        let id = entry_id(timestamp);

        let analysis = match image_path {
            Some(path) => self.describe_screenshot(&id, path).await,
            None => None,
        };
        let described = analysis.is_some();
        let full_text = compose_text(text, analysis.as_deref());

        let embedding = if self.settings.embed_on_ingest {
            self.embed_for_ingest(&id, &full_text).await
        } else {
            None
        };
        let embedded = embedding.is_some();

        let entry = Entry {
            text: full_text,
            metadata: EntryMetadata {
                timestamp: epoch,
                timestamp_str: timestamp.to_string(),
                screenshot_path: image_path
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
            embedding,
        };

        // File I/O → spawn_blocking
        let store = Arc::clone(&self.store);
        let key = id.clone();
        let replaced = tokio::task::spawn_blocking(move || store.upsert(&key, entry)).await??;

        tracing::info!(id = %id, embedded, described, replaced, "entry saved");

        Ok(IngestOutcome {
            id,
            embedded,
            described,
            replaced,
        })
    }

    /// Ingest a structured activity sample.
    pub async fn ingest_sample(
        &self,
        sample: &ActivitySample,
        timestamp: &str,
        image_path: Option<&Path>,
    ) -> JournalResult<IngestOutcome> {
        self.ingest(&sample.to_text(), timestamp, image_path).await
    }

    async fn describe_screenshot(&self, id: &str, path: &Path) -> Option<String> {
        let Some(provider) = self.providers.description.as_ref() else {
            tracing::debug!(id, "no description provider, skipping screen analysis");
            return None;
        };

        let image = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(id, path = %path.display(), error = %e, "screenshot unreadable");
                return None;
            }
        };

        match self
            .with_timeout("screen analysis", provider.describe(&image))
            .await
        {
            Ok(description) => Some(description),
            Err(e) => {
                tracing::warn!(id, error = %format!("{e:#}"), "screen analysis failed, storing N/A");
                None
            }
        }
    }

    async fn embed_for_ingest(&self, id: &str, text: &str) -> Option<Vec<f32>> {
        let provider = self.providers.embedding.as_ref()?;

        match self.with_timeout("embedding", provider.embed(text)).await {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                tracing::warn!(
                    id,
                    model = provider.model_name(),
                    error = %format!("{e:#}"),
                    "embedding failed, saving entry without it"
                );
                None
            }
        }
    }
}

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use octolog::journal::ingest::entry_id;
use octolog::journal::timestamp::parse_timestamp;
use octolog::journal::types::{Entry, EntryMetadata};
use octolog::journal::{Journal, JournalSettings};
use octolog::providers::{
    DescriptionProvider, EmbeddingProvider, GenerationProvider, Providers,
};
use octolog::store::EntryStore;
use tempfile::TempDir;

/// A journal backed by a store in a temp dir. The dir lives as long as this.
pub struct TestJournal {
    pub dir: TempDir,
    pub journal: Arc<Journal>,
}

impl TestJournal {
    pub fn store(&self) -> &Arc<EntryStore> {
        self.journal.store()
    }
}

/// Settings with a short provider timeout and reports inside `dir`.
pub fn test_settings(dir: &TempDir) -> JournalSettings {
    JournalSettings {
        provider_timeout: Duration::from_millis(200),
        report_dir: dir.path().join("reports"),
        ..JournalSettings::default()
    }
}

pub fn test_journal(providers: Providers) -> TestJournal {
    let dir = TempDir::new().unwrap();
    let store = EntryStore::open(dir.path().join("db.json")).unwrap();
    let journal = Journal::new(Arc::new(store), providers, test_settings(&dir));
    TestJournal {
        dir,
        journal: Arc::new(journal),
    }
}

/// Write an entry straight into the store, bypassing providers.
pub fn put_entry(store: &EntryStore, timestamp: &str, text: &str, embedding: Option<Vec<f32>>) {
    let entry = Entry {
        text: text.to_string(),
        metadata: EntryMetadata {
            timestamp: parse_timestamp(timestamp).unwrap(),
            timestamp_str: timestamp.to_string(),
            screenshot_path: String::new(),
        },
        embedding,
    };
    store.upsert(&entry_id(timestamp), entry).unwrap();
}

/// Embeds text to the vector of the first key it contains, else `fallback`.
pub struct TableEmbedder {
    table: Vec<(String, Vec<f32>)>,
    fallback: Vec<f32>,
    pub calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(table: &[(&str, Vec<f32>)], fallback: Vec<f32>) -> Arc<Self> {
        Arc::new(Self {
            table: table
                .iter()
                .map(|(key, v)| (key.to_string(), v.clone()))
                .collect(),
            fallback,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hit = self
            .table
            .iter()
            .find(|(key, _)| text.contains(key.as_str()))
            .map(|(_, v)| v.clone());
        Ok(hit.unwrap_or_else(|| self.fallback.clone()))
    }

    fn model_name(&self) -> &str {
        "table"
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        bail!("embedding service unavailable")
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Never answers within a test timeout.
pub struct HangingEmbedder;

#[async_trait]
impl EmbeddingProvider for HangingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![1.0, 0.0])
    }

    fn model_name(&self) -> &str {
        "hanging"
    }
}

/// Records every prompt and answers with a fixed reply.
pub struct RecordingGenerator {
    reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl GenerationProvider for FailingGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        bail!("generation service unavailable")
    }
}

pub struct FixedDescriber(pub &'static str);

#[async_trait]
impl DescriptionProvider for FixedDescriber {
    async fn describe(&self, image: &[u8]) -> Result<String> {
        if image.is_empty() {
            bail!("empty image");
        }
        Ok(self.0.to_string())
    }
}

pub struct FailingDescriber;

#[async_trait]
impl DescriptionProvider for FailingDescriber {
    async fn describe(&self, _image: &[u8]) -> Result<String> {
        bail!("vision service unavailable")
    }
}

//! Core journal type definitions.
//!
//! [`Entry`] is the persisted unit of activity, keyed by an id derived from its
//! timestamp. [`Store`] is the whole persisted mapping. The remaining types are
//! what retrieval and reporting hand back to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The persisted mapping of entry id to entry.
///
/// Ids have the shape `entry_YYYY-MM-DD_HH-MM-SS`, so key order is also
/// chronological for well-formed stores.
pub type Store = BTreeMap<String, Entry>;

/// One persisted unit of activity knowledge.
///
/// Field names are part of the on-disk format shared with other readers of the
/// store and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Activity facts followed by the `SCREEN ANALYSIS:` line.
    pub text: String,
    pub metadata: EntryMetadata,
    /// Absent for legacy entries and for entries whose embedding failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Epoch seconds of `timestamp_str`, interpreted in local time.
    pub timestamp: i64,
    /// `"YYYY-MM-DD HH:MM:SS"`.
    pub timestamp_str: String,
    /// Screenshot the entry was built from; empty when there was none.
    #[serde(default)]
    pub screenshot_path: String,
}

impl Entry {
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

/// Raw activity facts as produced by the sampling loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySample {
    pub active_windows: Vec<String>,
    pub keyboard_ticks: u64,
    pub mouse_ticks: u64,
}

impl ActivitySample {
    /// Format the sample as the text block stored in an entry.
    pub fn to_text(&self) -> String {
        format!(
            "ACTIVE_WINDOWS: {}\nKEYBOARD_TICKS: {}\nMOUSE_TICKS: {}",
            self.active_windows.join(", "),
            self.keyboard_ticks,
            self.mouse_ticks
        )
    }
}

/// How a retrieval call ordered its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Ascending time order; used without a query or without embeddings.
    Chronological,
    /// Cosine similarity against the query embedding, descending.
    Similarity,
}

impl RetrievalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chronological => "chronological",
            Self::Similarity => "similarity",
        }
    }
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single retrieved entry.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedEntry {
    pub id: String,
    pub text: String,
    pub metadata: EntryMetadata,
    /// Cosine similarity; only set in similarity mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Result of a retrieval call, most relevant (or earliest) first.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub mode: RetrievalMode,
    pub entries: Vec<RetrievedEntry>,
}

impl Retrieval {
    pub fn empty(mode: RetrievalMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }
}

/// Outcome of a single ingest.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub id: String,
    pub embedded: bool,
    pub described: bool,
    /// `true` when an entry with the same id was overwritten.
    pub replaced: bool,
}

/// A generated report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub start: String,
    pub end: String,
    /// Generator output, verbatim.
    pub body: String,
    pub entry_count: usize,
    pub mode: RetrievalMode,
}

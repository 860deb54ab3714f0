use std::collections::BTreeSet;

use serde::Serialize;

use crate::journal::types::Store;

/// Summary counts over a store.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_entries: usize,
    pub embedded_entries: usize,
    pub unembedded_entries: usize,
    pub with_screenshot: usize,
    pub embedding_dimensions: BTreeSet<usize>,
    pub store_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_entry: Option<String>,
}

/// Compute statistics for `store`. `size_bytes` is the persisted file size.
pub fn journal_stats(store: &Store, size_bytes: u64) -> StatsResponse {
    let embedded_entries = store.values().filter(|e| e.has_embedding()).count();
    let with_screenshot = store
        .values()
        .filter(|e| !e.metadata.screenshot_path.is_empty())
        .count();
    let embedding_dimensions = store
        .values()
        .filter_map(|e| e.embedding.as_ref().map(Vec::len))
        .collect();

    let oldest = store.values().min_by_key(|e| e.metadata.timestamp);
    let newest = store.values().max_by_key(|e| e.metadata.timestamp);

    StatsResponse {
        total_entries: store.len(),
        embedded_entries,
        unembedded_entries: store.len() - embedded_entries,
        with_screenshot,
        embedding_dimensions,
        store_size_bytes: size_bytes,
        oldest_entry: oldest.map(|e| e.metadata.timestamp_str.clone()),
        newest_entry: newest.map(|e| e.metadata.timestamp_str.clone()),
    }
}

//! Read path: time filtering, then similarity ranking or chronological fallback.
//!
//! Similarity ranking needs embeddings on both sides. Without a query, or when
//! no candidate in the range carries an embedding, results come back in
//! ascending time order instead.

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::anyhow;

use crate::error::{JournalError, JournalResult};
use crate::journal::timestamp::TimeRange;
use crate::journal::types::{Entry, Retrieval, RetrievalMode, RetrievedEntry, Store};
use crate::journal::Journal;

/// Cosine similarity of two vectors, clamped to `[-1, 1]`.
///
/// Returns `0.0` when either vector has zero norm. Vectors of different length
/// are compared over their common prefix; norms still cover each full vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Entries inside `range` (all entries if `None`), in ascending time order.
///
/// Entries sharing a timestamp are ordered by id.
pub fn select_candidates(store: &Store, range: Option<TimeRange>) -> Vec<(&String, &Entry)> {
    let mut candidates: Vec<(&String, &Entry)> = store
        .iter()
        .filter(|(_, entry)| range.map_or(true, |r| r.contains(entry.metadata.timestamp)))
        .collect();
    candidates.sort_by(|a, b| {
        a.1.metadata
            .timestamp
            .cmp(&b.1.metadata.timestamp)
            .then_with(|| a.0.cmp(b.0))
    });
    candidates
}

/// The first `limit` candidates, unscored.
pub fn chronological(candidates: &[(&String, &Entry)], limit: usize) -> Vec<RetrievedEntry> {
    candidates
        .iter()
        .take(limit)
        .map(|(id, entry)| to_retrieved(id, entry, None))
        .collect()
}

/// Score every embedded candidate against `query` and keep the top `limit`.
///
/// Candidates without an embedding are skipped. Equal scores go to the more
/// recent entry first.
pub fn rank_by_similarity(
    query: &[f32],
    candidates: &[(&String, &Entry)],
    limit: usize,
) -> Vec<RetrievedEntry> {
    let mut scored: Vec<(f64, &String, &Entry)> = candidates
        .iter()
        .filter_map(|(id, entry)| {
            entry
                .embedding
                .as_deref()
                .map(|embedding| (cosine_similarity(query, embedding), *id, *entry))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.2.metadata.timestamp.cmp(&a.2.metadata.timestamp))
            .then_with(|| b.1.cmp(a.1))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(score, id, entry)| to_retrieved(id, entry, Some(score)))
        .collect()
}

fn to_retrieved(id: &str, entry: &Entry, score: Option<f64>) -> RetrievedEntry {
    RetrievedEntry {
        id: id.to_string(),
        text: entry.text.clone(),
        metadata: entry.metadata.clone(),
        score,
    }
}

impl Journal {
    /// Select up to `limit` entries relevant to `query` within `[start, end]`.
    ///
    /// The range applies only when both bounds are given. Fails with
    /// [`JournalError::RetrievalProvider`] only when similarity mode is chosen
    /// and the query cannot be embedded.
    pub async fn retrieve(
        &self,
        query: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        limit: usize,
    ) -> JournalResult<Retrieval> {
        if limit == 0 {
            return Err(JournalError::InvalidLimit(limit));
        }

        let range = match (start, end) {
            (Some(start), Some(end)) => Some(TimeRange::parse(start, end)?),
            (None, None) => None,
            _ => {
                tracing::warn!(?start, ?end, "time range needs both bounds, ignoring it");
                None
            }
        };

        // File I/O → spawn_blocking
        let store = Arc::clone(&self.store);
        let snapshot = tokio::task::spawn_blocking(move || store.all()).await??;

        let candidates = select_candidates(&snapshot, range);
        if candidates.is_empty() {
            tracing::debug!(?range, "no entries in range");
            return Ok(Retrieval::empty(RetrievalMode::Chronological));
        }

        let query = query.filter(|q| !q.trim().is_empty());
        let any_embedded = candidates.iter().any(|(_, e)| e.has_embedding());

        let Some(query) = query.filter(|_| any_embedded) else {
            let entries = chronological(&candidates, limit);
            tracing::debug!(
                candidates = candidates.len(),
                returned = entries.len(),
                "chronological retrieval"
            );
            return Ok(Retrieval {
                mode: RetrievalMode::Chronological,
                entries,
            });
        };

        let query_embedding = self.embed_query(query).await?;
        let entries = rank_by_similarity(&query_embedding, &candidates, limit);
        tracing::debug!(
            candidates = candidates.len(),
            returned = entries.len(),
            "similarity retrieval"
        );

        Ok(Retrieval {
            mode: RetrievalMode::Similarity,
            entries,
        })
    }

    async fn embed_query(&self, query: &str) -> JournalResult<Vec<f32>> {
        let provider = self
            .providers
            .embedding
            .as_ref()
            .ok_or_else(|| {
                JournalError::RetrievalProvider(anyhow!(
                    "no embedding provider configured but entries carry embeddings"
                ))
            })?;

        self.with_timeout("query embedding", provider.embed(query))
            .await
            .map_err(JournalError::RetrievalProvider)
    }
}

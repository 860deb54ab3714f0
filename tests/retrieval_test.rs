mod helpers;

use std::sync::Arc;

use helpers::*;
use octolog::error::JournalError;
use octolog::journal::timestamp::format_timestamp;
use octolog::journal::types::RetrievalMode;
use octolog::providers::Providers;

const DAY: &str = "2026-02-26";

fn at(time: &str) -> String {
    format!("{DAY} {time}")
}

#[tokio::test]
async fn time_range_without_embeddings_is_chronological() {
    let tj = test_journal(Providers::none());
    for time in ["10:00:00", "09:00:00", "09:30:00"] {
        put_entry(tj.store(), &at(time), &format!("at {time}"), None);
    }

    let result = tj
        .journal
        .retrieve(None, Some(&at("09:15:00")), Some(&at("10:30:00")), 10)
        .await
        .unwrap();

    assert_eq!(result.mode, RetrievalMode::Chronological);
    let texts: Vec<&str> = result.texts().collect();
    assert_eq!(texts, vec!["at 09:30:00", "at 10:00:00"]);
}

#[tokio::test]
async fn query_without_embeddings_falls_back_to_time_order() {
    let embedder = TableEmbedder::new(&[], vec![1.0, 0.0]);
    let tj = test_journal(Providers::none().with_embedding(embedder.clone()));
    for (i, time) in ["11:00:00", "09:00:00", "10:00:00"].iter().enumerate() {
        put_entry(tj.store(), &at(time), &format!("entry {i}"), None);
    }

    let result = tj
        .journal
        .retrieve(Some("anything at all"), None, None, 2)
        .await
        .unwrap();

    assert_eq!(result.mode, RetrievalMode::Chronological);
    let stamps: Vec<&str> = result
        .entries
        .iter()
        .map(|e| e.metadata.timestamp_str.as_str())
        .collect();
    assert_eq!(stamps, vec![at("09:00:00"), at("10:00:00")]);
    // Chronological mode never consults the provider.
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn similarity_ranks_matching_direction_first() {
    let embedder = TableEmbedder::new(&[("editor", vec![1.0, 0.0])], vec![0.0, 1.0]);
    let tj = test_journal(Providers::none().with_embedding(embedder));
    put_entry(tj.store(), &at("09:00:00"), "first", Some(vec![1.0, 0.0]));
    put_entry(tj.store(), &at("10:00:00"), "second", Some(vec![0.0, 1.0]));

    let result = tj
        .journal
        .retrieve(Some("editor"), None, None, 10)
        .await
        .unwrap();

    assert_eq!(result.mode, RetrievalMode::Similarity);
    assert_eq!(result.entries[0].text, "first");
    assert_eq!(result.entries[1].text, "second");
    assert!(result.entries[0].score.unwrap() > result.entries[1].score.unwrap());
}

#[tokio::test]
async fn similarity_excludes_unembedded_candidates() {
    let embedder = TableEmbedder::new(&[], vec![1.0, 0.0]);
    let tj = test_journal(Providers::none().with_embedding(embedder));
    put_entry(tj.store(), &at("09:00:00"), "legacy", None);
    put_entry(tj.store(), &at("10:00:00"), "modern", Some(vec![0.6, 0.8]));

    let result = tj.journal.retrieve(Some("q"), None, None, 10).await.unwrap();

    assert_eq!(result.mode, RetrievalMode::Similarity);
    assert_eq!(result.texts().collect::<Vec<_>>(), vec!["modern"]);
}

#[tokio::test]
async fn equal_scores_prefer_newer_entries() {
    let embedder = TableEmbedder::new(&[], vec![1.0, 0.0]);
    let tj = test_journal(Providers::none().with_embedding(embedder));
    put_entry(tj.store(), &at("09:00:00"), "older", Some(vec![2.0, 0.0]));
    put_entry(tj.store(), &at("12:00:00"), "newer", Some(vec![1.0, 0.0]));

    let result = tj.journal.retrieve(Some("q"), None, None, 10).await.unwrap();
    assert_eq!(result.texts().collect::<Vec<_>>(), vec!["newer", "older"]);
}

#[tokio::test]
async fn range_bounds_are_inclusive() {
    let tj = test_journal(Providers::none());
    let start = at("09:00:00");
    let end = at("10:00:00");
    put_entry(tj.store(), &at("08:59:59"), "before", None);
    put_entry(tj.store(), &start, "at start", None);
    put_entry(tj.store(), &end, "at end", None);
    put_entry(tj.store(), &at("10:00:01"), "after", None);

    let result = tj
        .journal
        .retrieve(None, Some(&start), Some(&end), 10)
        .await
        .unwrap();

    assert_eq!(result.texts().collect::<Vec<_>>(), vec!["at start", "at end"]);
}

#[tokio::test]
async fn limit_is_respected_in_every_mode() {
    let embedder = TableEmbedder::new(&[], vec![1.0, 1.0]);
    let tj = test_journal(Providers::none().with_embedding(embedder));
    let base = octolog::journal::timestamp::parse_timestamp(&at("08:00:00")).unwrap();
    for i in 0..25 {
        let ts = format_timestamp(base + i * 60).unwrap();
        let embedding = (i % 2 == 0).then(|| vec![1.0, i as f32]);
        put_entry(tj.store(), &ts, &format!("minute {i}"), embedding);
    }

    for limit in [1, 3, 10, 100] {
        let chrono = tj.journal.retrieve(None, None, None, limit).await.unwrap();
        assert_eq!(chrono.len(), limit.min(25));

        let similar = tj.journal.retrieve(Some("q"), None, None, limit).await.unwrap();
        assert_eq!(similar.mode, RetrievalMode::Similarity);
        assert_eq!(similar.len(), limit.min(13));
    }
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let tj = test_journal(Providers::none());
    let err = tj.journal.retrieve(None, None, None, 0).await.unwrap_err();
    assert!(matches!(err, JournalError::InvalidLimit(0)));
}

#[tokio::test]
async fn empty_store_returns_empty_result() {
    let tj = test_journal(Providers::none().with_embedding(Arc::new(FailingEmbedder)));
    let result = tj
        .journal
        .retrieve(Some("what happened"), None, None, 10)
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn malformed_bound_is_invalid_timestamp() {
    let tj = test_journal(Providers::none());
    put_entry(tj.store(), &at("09:00:00"), "x", None);

    let err = tj
        .journal
        .retrieve(None, Some("yesterday"), Some(&at("10:00:00")), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, JournalError::InvalidTimestamp { .. }));
}

#[tokio::test]
async fn single_bound_is_ignored() {
    let tj = test_journal(Providers::none());
    put_entry(tj.store(), &at("09:00:00"), "a", None);
    put_entry(tj.store(), &at("11:00:00"), "b", None);

    let result = tj
        .journal
        .retrieve(None, Some(&at("10:00:00")), None, 10)
        .await
        .unwrap();
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn query_embedding_failure_is_surfaced() {
    let tj = test_journal(Providers::none().with_embedding(Arc::new(FailingEmbedder)));
    put_entry(tj.store(), &at("09:00:00"), "x", Some(vec![1.0, 0.0]));

    let err = tj.journal.retrieve(Some("q"), None, None, 10).await.unwrap_err();
    assert!(matches!(err, JournalError::RetrievalProvider(_)));

    // Omitting the query still works.
    let result = tj.journal.retrieve(None, None, None, 10).await.unwrap();
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn query_embedding_timeout_is_surfaced() {
    let tj = test_journal(Providers::none().with_embedding(Arc::new(HangingEmbedder)));
    put_entry(tj.store(), &at("09:00:00"), "x", Some(vec![1.0, 0.0]));

    let err = tj.journal.retrieve(Some("q"), None, None, 10).await.unwrap_err();
    assert!(matches!(err, JournalError::RetrievalProvider(_)));
}

#[tokio::test]
async fn missing_provider_with_embedded_entries_is_surfaced() {
    let tj = test_journal(Providers::none());
    put_entry(tj.store(), &at("09:00:00"), "x", Some(vec![1.0, 0.0]));

    let err = tj.journal.retrieve(Some("q"), None, None, 10).await.unwrap_err();
    assert!(matches!(err, JournalError::RetrievalProvider(_)));
}

#[tokio::test]
async fn blank_query_counts_as_absent() {
    let tj = test_journal(Providers::none().with_embedding(Arc::new(FailingEmbedder)));
    put_entry(tj.store(), &at("09:00:00"), "x", Some(vec![1.0, 0.0]));

    let result = tj.journal.retrieve(Some("   "), None, None, 10).await.unwrap();
    assert_eq!(result.mode, RetrievalMode::Chronological);
}

//! Single-writer ingestion queue.
//!
//! Producers (sampling loops, HTTP handlers) submit requests through a bounded
//! channel; one writer task ingests them in arrival order. Each submitter gets
//! its own outcome back over a oneshot channel.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{JournalError, JournalResult};
use crate::journal::types::IngestOutcome;
use crate::journal::Journal;

#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub text: String,
    pub timestamp: String,
    #[serde(default)]
    pub image_path: Option<PathBuf>,
}

struct Job {
    request: IngestRequest,
    reply: oneshot::Sender<JournalResult<IngestOutcome>>,
}

/// Handle for submitting entries to the writer task. Cheap to clone.
#[derive(Clone)]
pub struct IngestQueue {
    sender: mpsc::Sender<Job>,
}

impl IngestQueue {
    /// Start the writer task. It runs until every queue handle is dropped.
    pub fn spawn(journal: Arc<Journal>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_writer(journal, receiver));
        (Self { sender }, handle)
    }

    /// Queue a request and wait for it to be committed.
    ///
    /// Waits for queue space when the writer is behind.
    pub async fn submit(&self, request: IngestRequest) -> JournalResult<IngestOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.sender
            .send(Job { request, reply })
            .await
            .map_err(|_| JournalError::QueueClosed)?;
        outcome.await.map_err(|_| JournalError::QueueClosed)?
    }
}

async fn run_writer(journal: Arc<Journal>, mut receiver: mpsc::Receiver<Job>) {
    tracing::info!("ingestion writer started");

    while let Some(Job { request, reply }) = receiver.recv().await {
        let result = journal
            .ingest(
                &request.text,
                &request.timestamp,
                request.image_path.as_deref(),
            )
            .await;

        if let Err(ref e) = result {
            tracing::error!(timestamp = %request.timestamp, error = %e, "queued ingest failed");
        }
        // Submitter may have gone away.
        let _ = reply.send(result);
    }

    tracing::info!("ingestion writer stopped");
}

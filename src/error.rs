//! Error taxonomy for journal operations.
//!
//! Store and input failures are always surfaced. Provider failures surface as
//! [`JournalError::RetrievalProvider`] or [`JournalError::ReportGeneration`]
//! depending on which path needed the provider; ingestion never returns them.

use std::path::PathBuf;

use thiserror::Error;

pub type JournalResult<T> = Result<T, JournalError>;

#[derive(Debug, Error)]
pub enum JournalError {
    /// The persisted store exists but does not parse as an entry mapping.
    #[error("store at {path} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid timestamp {value:?}: expected \"YYYY-MM-DD HH:MM:SS\"")]
    InvalidTimestamp { value: String },

    #[error("limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    /// The query could not be embedded while candidates carry embeddings.
    #[error("embedding provider failed during retrieval: {0:#}")]
    RetrievalProvider(anyhow::Error),

    #[error("report generation failed: {0:#}")]
    ReportGeneration(anyhow::Error),

    #[error("store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("ingestion writer has stopped")]
    QueueClosed,
}

impl JournalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }

    /// `true` for errors caused by caller input rather than by the journal
    /// or its collaborators.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimestamp { .. } | Self::InvalidLimit(_)
        )
    }

    /// `true` for failures of an external provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::RetrievalProvider(_) | Self::ReportGeneration(_))
    }
}

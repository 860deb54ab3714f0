//! Personal activity journal: timestamped activity entries with semantic
//! retrieval and AI-written reports.
//!
//! A sampling loop records what the user is doing (active windows, keyboard and
//! mouse tick counts, optionally a screenshot) about once a minute. Each sample
//! becomes an [`Entry`](journal::types::Entry) holding the activity text, a
//! screen description, and an optional embedding. Later the journal answers
//! questions or writes reports for a time range by retrieving the relevant
//! entries and handing them to a text-generation provider.
//!
//! # Architecture
//!
//! - **Storage**: one pretty-printed JSON document mapping entry ids to entries,
//!   rewritten atomically (temp file + rename) on every write
//! - **Retrieval**: inclusive time filter, then cosine-similarity ranking, or
//!   chronological order when there is no query or no embeddings
//! - **Providers**: embedding, generation, and screenshot description behind
//!   capability traits; an OpenAI-compatible client implements all three
//! - **Front ends**: HTTP (axum) and a terminal CLI
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files and environment variables
//! - [`error`] - Typed errors for store, input, and provider failures
//! - [`store`] - The persisted entry mapping: load, atomic upsert, snapshots, health
//! - [`journal`] - Ingestion, retrieval, report assembly, and the ingestion queue
//! - [`providers`] - AI collaborator traits and the OpenAI-compatible client

pub mod config;
pub mod error;
pub mod journal;
pub mod providers;
pub mod store;

//! External AI collaborators.
//!
//! The journal depends only on the three capability traits here. Concrete
//! providers are created via [`create_providers`] from configuration; tests
//! substitute deterministic fakes.

pub mod openai;
pub mod screenshot;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::ProviderConfig;

/// Turns text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Turns a prompt into prose.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Describes a screenshot in natural language.
#[async_trait]
pub trait DescriptionProvider: Send + Sync {
    async fn describe(&self, image: &[u8]) -> Result<String>;
}

/// The set of collaborators a journal is wired with. Any of them may be absent.
#[derive(Clone, Default)]
pub struct Providers {
    pub embedding: Option<Arc<dyn EmbeddingProvider>>,
    pub generation: Option<Arc<dyn GenerationProvider>>,
    pub description: Option<Arc<dyn DescriptionProvider>>,
}

impl Providers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_embedding(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding = Some(provider);
        self
    }

    pub fn with_generation(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation = Some(provider);
        self
    }

    pub fn with_description(mut self, provider: Arc<dyn DescriptionProvider>) -> Self {
        self.description = Some(provider);
        self
    }
}

/// Create the providers named by config.
///
/// `"openai"` wires one OpenAI-compatible client into all three roles;
/// `"none"` leaves every role empty. Without an API key the openai roles are
/// left empty too, so ingestion and chronological retrieval keep working.
pub fn create_providers(config: &ProviderConfig) -> Result<Providers> {
    let api_key = config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|key| !key.trim().is_empty());
    providers_with_key(config, api_key)
}

fn providers_with_key(config: &ProviderConfig, api_key: Option<String>) -> Result<Providers> {
    match config.kind.as_str() {
        "openai" => {
            let Some(api_key) = api_key else {
                tracing::warn!(
                    "OpenAI API key not found (set OPENAI_API_KEY or providers.api_key); \
                     running without embeddings, screen analysis or reports"
                );
                return Ok(Providers::none());
            };
            let client = Arc::new(openai::OpenAiClient::new(config, api_key)?);
            tracing::info!(
                base_url = %config.base_url,
                embedding_model = %config.embedding_model,
                generation_model = %config.generation_model,
                "openai providers ready"
            );
            Ok(Providers {
                embedding: Some(client.clone()),
                generation: Some(client.clone()),
                description: Some(client),
            })
        }
        "none" => {
            tracing::info!("AI providers disabled");
            Ok(Providers::none())
        }
        other => anyhow::bail!("unknown provider kind: {other}. Supported: openai, none"),
    }
}

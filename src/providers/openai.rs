//! OpenAI-compatible HTTP provider.
//!
//! One client serves all three roles: `/embeddings` for [`EmbeddingProvider`],
//! `/chat/completions` for [`GenerationProvider`], and a chat completion with
//! an inline JPEG for [`DescriptionProvider`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::screenshot::prepare_for_vision;
use super::{DescriptionProvider, EmbeddingProvider, GenerationProvider};
use crate::config::ProviderConfig;

const DESCRIBE_PROMPT: &str = "What do you see in this screenshot? Briefly explain.";

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
    generation_model: String,
    vision_model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            embedding_model: config.embedding_model.clone(),
            generation_model: config.generation_model.clone(),
            vision_model: config.vision_model.clone(),
        })
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .with_context(|| format!("HTTP request failed for {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("{url} returned HTTP {status}: {detail}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("unexpected response body from {url}"))
    }

    async fn chat(&self, model: &str, content: serde_json::Value) -> Result<String> {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": content}],
        });
        let response: ChatResponse = self.post("chat/completions", &body).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("chat completion returned no content")
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };
        let response: EmbeddingResponse = self.post("embeddings", &request).await?;
        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("no embedding returned")
    }

    fn model_name(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&self.generation_model, json!(prompt)).await
    }
}

#[async_trait]
impl DescriptionProvider for OpenAiClient {
    async fn describe(&self, image: &[u8]) -> Result<String> {
        let raw = image.to_vec();
        // Decode/resize/encode is CPU-bound → spawn_blocking
        let jpeg = tokio::task::spawn_blocking(move || prepare_for_vision(&raw))
            .await
            .context("screenshot preparation task failed")??;

        let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg));
        let content = json!([
            {"type": "image_url", "image_url": {"url": data_url}},
            {"type": "text", "text": DESCRIBE_PROMPT},
        ]);
        self.chat(&self.vision_model, content).await
    }
}

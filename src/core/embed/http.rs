//! OpenAI-compatible embeddings client.
//!
//! Works against any service exposing the `/v1/embeddings` contract:
//! OpenAI itself, text-embeddings-inference, llama.cpp server, Ollama.
//! One request per batch; retry scheduling is the caller's concern, so
//! failures carry whether a retry is worthwhile.

use crate::core::config::EmbeddingConfig;
use crate::core::embed::Embedder;
use crate::core::error::{BrewsyncError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dims: usize,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            dims: config.dims,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };
        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            let body = response.text().await.unwrap_or_default();
            return Err(BrewsyncError::EmbeddingService {
                message: format!("Embedding request failed with {status}: {}", body.trim()),
                retryable,
            });
        }

        let parsed: EmbeddingsResponse = response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(BrewsyncError::EmbeddingService {
                message: format!(
                    "Embedding service returned {} vectors for {} inputs",
                    parsed.data.len(),
                    texts.len()
                ),
                retryable: false,
            });
        }

        // Services may reorder results; the index field is authoritative
        let mut items = parsed.data;
        items.sort_by_key(|item| item.index);

        let mut vectors = Vec::with_capacity(items.len());
        for item in items {
            if item.embedding.len() != self.dims {
                return Err(BrewsyncError::EmbeddingService {
                    message: format!(
                        "Embedding dimension {} does not match expected {}",
                        item.embedding.len(),
                        self.dims
                    ),
                    retryable: false,
                });
            }
            vectors.push(item.embedding);
        }

        debug!(
            model = %self.model,
            batch = texts.len(),
            "Embedded batch"
        );
        Ok(vectors)
    }
}

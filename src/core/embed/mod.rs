//! Embedding provider abstraction.
//!
//! Chunk text becomes vectors through the [`Embedder`] trait. The
//! production implementation calls an OpenAI-compatible HTTP endpoint;
//! [`DisabledEmbedder`] backs runs that must never embed (offline
//! validation) and fails loudly if asked to.

pub mod http;

pub use http::HttpEmbedder;

use crate::core::error::{BrewsyncError, Result};
use async_trait::async_trait;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model identifier sent to the service and recorded in logs
    fn model_name(&self) -> &str;

    /// Dimensionality of the vectors this embedder produces
    fn dims(&self) -> usize;

    /// Embed a batch of texts, one vector per input in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embedder for runs where embedding is not available.
///
/// Validation-only passes never reach `embed_batch`; if a code path
/// does, the error makes the miswiring obvious.
#[derive(Debug, Default)]
pub struct DisabledEmbedder;

#[async_trait]
impl Embedder for DisabledEmbedder {
    fn model_name(&self) -> &str {
        "disabled"
    }

    fn dims(&self) -> usize {
        0
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(BrewsyncError::EmbeddingService {
            message: "Embedding is disabled for this run".to_string(),
            retryable: false,
        })
    }
}

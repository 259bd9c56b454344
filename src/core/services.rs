//! Unified service container for Brewsync
//!
//! Provides shared access to the configured store and embedder gateways.

use crate::core::config::Config;
use crate::core::embed::{DisabledEmbedder, Embedder, HttpEmbedder};
use crate::core::error::Result;
use crate::core::store::{MemoryStore, QdrantStore, VectorStore};
use crate::core::sync::SyncEngine;
use std::sync::Arc;

/// Unified services container
///
/// Every command builds one of these and drives a [`SyncEngine`] off it.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Vector store gateway
    pub store: Arc<dyn VectorStore>,

    /// Embedding gateway
    pub embedder: Arc<dyn Embedder>,
}

impl Services {
    /// Full wiring: Qdrant store and HTTP embedder from configuration
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(QdrantStore::new(&config.store)?);
        let embedder = Arc::new(HttpEmbedder::new(&config.embedding)?);
        Ok(Self {
            config: Arc::new(config),
            store,
            embedder,
        })
    }

    /// Dry-run wiring: the pass runs end to end, including embedding,
    /// against an empty in-memory store so nothing durable is written
    pub fn dry_run(config: Config) -> Result<Self> {
        let embedder = Arc::new(HttpEmbedder::new(&config.embedding)?);
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(MemoryStore::new()),
            embedder,
        })
    }

    /// Cleanup-only wiring: real store, embedder errors if ever called
    pub fn cleanup_only(config: Config) -> Result<Self> {
        let store = Arc::new(QdrantStore::new(&config.store)?);
        Ok(Self {
            config: Arc::new(config),
            store,
            embedder: Arc::new(DisabledEmbedder),
        })
    }

    /// Analysis-only wiring: neither gateway is ever contacted
    pub fn analysis_only(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(MemoryStore::new()),
            embedder: Arc::new(DisabledEmbedder),
        }
    }

    /// Create a sync engine over these services
    pub fn engine(&self) -> Result<SyncEngine> {
        SyncEngine::new(
            Arc::clone(&self.config),
            Arc::clone(&self.store),
            Arc::clone(&self.embedder),
        )
    }
}

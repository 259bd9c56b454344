// Test helper functions

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use brewsync::core::config::Config;
use brewsync::core::embed::Embedder;
use brewsync::core::error::Result;
use brewsync::core::services::Services;
use brewsync::core::store::MemoryStore;
use brewsync::core::sync::SyncEngine;

/// Deterministic embedder for tests. Counts batch calls so reruns can
/// assert that skipped files were never embedded.
pub struct CountingEmbedder {
    dims: usize,
    calls: AtomicUsize,
}

#[allow(dead_code)] // Used in integration tests
impl CountingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0; self.dims];
                if let Some(first) = vector.first_mut() {
                    *first = text.chars().count() as f32;
                }
                vector
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "counting-stub"
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

/// Config wired to a fixture's content roots, with small batches and
/// 4-dimensional vectors to keep tests fast
#[allow(dead_code)] // Used in integration tests
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.ingest.transcripts_dir = root.join("transcripts");
    config.ingest.ocr_texts_dir = root.join("ocr");
    config.ingest.manuals_dir = Some(root.join("manuals"));
    config.processing.max_workers = 2;
    config.processing.batch_size = 2;
    config.processing.max_retries = 1;
    config.embedding.dims = 4;
    config.store.vector_size = 4;
    config
}

/// Services over an in-memory store and a counting embedder, sharing
/// handles with the caller so assertions can reach both sides
#[allow(dead_code)] // Used in CLI tests
pub fn test_services(
    config: Config,
    store: Arc<MemoryStore>,
    embedder: Arc<CountingEmbedder>,
) -> Services {
    Services {
        config: Arc::new(config),
        store,
        embedder,
    }
}

/// Engine over an in-memory store and a counting embedder
#[allow(dead_code)] // Used in integration tests
pub fn test_engine(
    config: Config,
    store: Arc<MemoryStore>,
    embedder: Arc<CountingEmbedder>,
) -> SyncEngine {
    SyncEngine::new(Arc::new(config), store, embedder)
        .expect("engine construction should succeed for test config")
}

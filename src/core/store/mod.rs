//! Vector store abstraction.
//!
//! The sync engine talks to the index through the [`VectorStore`] trait:
//! ensure the collection exists, upsert points, delete points by id or
//! by owning file, and enumerate the records currently indexed. The
//! production backend is Qdrant over REST; an in-memory backend supports
//! tests and offline validation.

pub mod memory;
pub mod qdrant;

pub use memory::MemoryStore;
pub use qdrant::QdrantStore;

use crate::core::error::Result;
use crate::core::types::{IndexRecord, TextChunk};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point ready to be written to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// The payload stored alongside each vector.
///
/// Identity fields (`file_id`, `config_id`, `sequence_index`,
/// `content_hash`) drive sync decisions; the rest is retrieval metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    pub file_id: String,
    pub config_id: String,
    pub sequence_index: usize,
    pub content_hash: String,
    pub text: String,
    pub quality_score: f64,
    pub content_type: String,
    pub source_path: String,
    pub text_length: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub keyword_counts: BTreeMap<String, usize>,
    pub processing_date: String,
}

impl IndexPoint {
    /// Pair an enriched chunk with its embedding vector
    pub fn from_chunk(chunk: &TextChunk, vector: Vec<f32>) -> Self {
        Self {
            id: chunk.point_id.clone(),
            vector,
            payload: PointPayload {
                file_id: chunk.file_id.clone(),
                config_id: chunk.config_id.clone(),
                sequence_index: chunk.sequence_index,
                content_hash: chunk.content_hash.clone(),
                text: chunk.text.clone(),
                quality_score: chunk.quality_score,
                content_type: chunk.metadata.content_type.label().to_string(),
                source_path: chunk.metadata.source_path.clone(),
                text_length: chunk.metadata.text_length,
                word_count: chunk.metadata.word_count,
                sentence_count: chunk.metadata.sentence_count,
                keyword_counts: chunk.metadata.keyword_counts.clone(),
                processing_date: chunk.metadata.processing_date.clone(),
            },
        }
    }
}

impl PointPayload {
    /// The store-side identity view of this payload
    pub fn to_record(&self, point_id: String) -> IndexRecord {
        IndexRecord {
            point_id,
            file_id: self.file_id.clone(),
            config_id: self.config_id.clone(),
            content_hash: self.content_hash.clone(),
        }
    }
}

/// Backend-agnostic interface to the chunk index
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection if missing; verify geometry if present.
    /// A vector-size mismatch is a fatal configuration error.
    async fn ensure_collection(&self) -> Result<()>;

    /// Insert or replace points by id
    async fn upsert(&self, points: &[IndexPoint]) -> Result<()>;

    /// Delete specific points by id
    async fn delete_points(&self, point_ids: &[String]) -> Result<()>;

    /// Delete every point belonging to a file
    async fn delete_by_file(&self, file_id: &str) -> Result<()>;

    /// Enumerate all records currently in the collection
    async fn list_records(&self) -> Result<Vec<IndexRecord>>;
}

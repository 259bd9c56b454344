//! Chunk identity and metadata enrichment.
//!
//! Builds the final `TextChunk` records: a content fingerprint that is
//! insensitive to whitespace layout, a deterministic point id scoping the
//! chunk to its file and configuration, and the provenance metadata
//! carried into the store payload. Given the same inputs this module
//! always produces the same records; the processing timestamp is passed
//! in by the caller rather than read from the clock here.

use crate::core::pipeline::validate::ValidationOutcome;
use crate::core::types::{ChunkMetadata, SourceFile, TextChunk};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// SHA-256 over the whitespace-normalized text, hex encoded.
///
/// Reformatting a file without changing its words keeps the fingerprint
/// stable, so pure layout edits never trigger re-embedding.
pub fn content_fingerprint(text: &str) -> String {
    let normalized = WHITESPACE_RE.replace_all(text.trim(), " ");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Deterministic point id: UUIDv5 over the chunk's full identity.
///
/// Scoping the id by file and config id keeps identical text in two
/// files (or under two configurations) from colliding, while re-running
/// the same pass regenerates the same id.
pub fn point_id(file_id: &str, config_id: &str, sequence_index: usize, content_hash: &str) -> String {
    let name = format!("{file_id}|{config_id}|{sequence_index}|{content_hash}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

/// Attaches identity and provenance to chunk texts
#[derive(Debug, Clone)]
pub struct Enricher {
    config_id: String,
}

impl Enricher {
    pub fn new(config_id: String) -> Self {
        Self { config_id }
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Build the record for one accepted chunk
    pub fn enrich(
        &self,
        file: &SourceFile,
        sequence_index: usize,
        text: String,
        outcome: &ValidationOutcome,
        processed_at: &str,
    ) -> TextChunk {
        let content_hash = content_fingerprint(&text);
        let point_id = point_id(&file.file_id, &self.config_id, sequence_index, &content_hash);

        let keyword_counts = outcome
            .analysis
            .keyword_hits
            .iter()
            .map(|(category, count)| (category.as_str().to_string(), *count))
            .collect();

        let metadata = ChunkMetadata {
            content_type: file.content_type,
            source_path: file.path.to_string_lossy().into_owned(),
            text_length: outcome.analysis.char_count,
            word_count: outcome.analysis.word_count,
            sentence_count: outcome.analysis.sentence_count,
            keyword_counts,
            processing_date: processed_at.to_string(),
        };

        TextChunk {
            point_id,
            file_id: file.file_id.clone(),
            config_id: self.config_id.clone(),
            sequence_index,
            text,
            content_hash,
            quality_score: outcome.score,
            metadata,
        }
    }
}

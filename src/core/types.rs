//! Core data types for the brewsync engine.
//!
//! This module defines the data structures shared across the
//! pipeline, the sync engine, and the store gateway: source files,
//! chunks, store-side records, and the per-pass reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Kind of upstream producer a watched root belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Speech-to-text output from recorded sessions
    Transcript,
    /// OCR text extracted from presentation slides
    Ocr,
    /// Hand-written manuals and guides
    Manual,
}

impl ContentType {
    /// Short tag used in configuration and file identities
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Transcript => "transcript",
            ContentType::Ocr => "ocr",
            ContentType::Manual => "manual",
        }
    }

    /// Label stored in chunk payloads
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Transcript => "video_transcript",
            ContentType::Ocr => "presentation_text",
            ContentType::Manual => "manual_text",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one source file for a single sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Stable identity: watched-root name joined with the
    /// root-relative path (e.g. `transcripts/ep01.txt`)
    pub file_id: String,

    /// Absolute path on disk
    pub path: PathBuf,

    /// Content type inherited from the watched root
    pub content_type: ContentType,

    /// File size in bytes
    pub size_bytes: u64,

    /// Last modification time (RFC 3339)
    pub modified_at: String,
}

/// Metadata attached to every chunk alongside its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Content type inherited from the source file
    pub content_type: ContentType,

    /// Absolute source path at processing time
    pub source_path: String,

    /// Character count of the chunk text
    pub text_length: usize,

    /// Whitespace-delimited word count
    pub word_count: usize,

    /// Detected sentence count
    pub sentence_count: usize,

    /// Domain keyword hits per lexicon category
    pub keyword_counts: BTreeMap<String, usize>,

    /// Processing timestamp (RFC 3339, UTC)
    pub processing_date: String,
}

/// A fully enriched chunk, ready for embedding and storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Deterministic point id (UUID v5 over identity + fingerprint)
    pub point_id: String,

    /// Owning source file
    pub file_id: String,

    /// Owning configuration identity
    pub config_id: String,

    /// Position of this chunk within the file
    pub sequence_index: usize,

    /// The chunk text
    pub text: String,

    /// SHA-256 fingerprint of the normalized chunk text
    pub content_hash: String,

    /// Quality score in `[0, 1]`
    pub quality_score: f64,

    /// Provenance and analysis metadata
    pub metadata: ChunkMetadata,
}

/// Store-side view of a chunk, rebuilt from enumerated payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Point id in the vector store
    pub point_id: String,

    /// Owning source file id
    pub file_id: String,

    /// Configuration identity the point was written under
    pub config_id: String,

    /// Content fingerprint of the stored chunk
    pub content_hash: String,
}

/// Outcome of one file in a sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Chunks embedded and written this pass
    Processed,
    /// Store already congruent; no embedding, no writes
    Skipped,
    /// Text failed quality validation; nothing written
    Rejected,
    /// Extraction, embedding, or store failure; existing records untouched
    Failed,
}

/// Per-file entry in a [`SyncReport`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Source file identity
    pub file_id: String,

    /// What happened to the file this pass
    pub status: FileStatus,

    /// Chunks written for this file
    pub chunks_created: usize,

    /// Superseded records deleted for this file
    pub chunks_deleted: usize,

    /// Rejection issues or failure message, when applicable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,

    /// Failure detail for `Failed` outcomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate results of a processing pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncReport {
    /// Files found under the watched roots
    pub files_scanned: usize,

    /// Files processed (embedded and written)
    pub files_processed: usize,

    /// Files skipped as already congruent
    pub files_skipped: usize,

    /// Files rejected by validation
    pub files_rejected: usize,

    /// Files that failed and will be retried next pass
    pub files_failed: usize,

    /// Chunks written to the store
    pub chunks_created: usize,

    /// Chunks rejected by per-chunk quality scoring
    pub chunks_rejected: usize,

    /// Stale or superseded records deleted
    pub chunks_deleted: usize,

    /// Total characters of processed text
    pub total_text_length: usize,

    /// Pass duration in milliseconds
    pub duration_ms: u64,

    /// Per-file outcomes in inventory order
    pub outcomes: Vec<FileOutcome>,
}

impl SyncReport {
    /// True when some files failed but the pass itself completed
    pub fn is_partial(&self) -> bool {
        self.files_failed > 0
    }

    /// Fold one file outcome into the aggregate counters
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome.status {
            FileStatus::Processed => self.files_processed += 1,
            FileStatus::Skipped => self.files_skipped += 1,
            FileStatus::Rejected => self.files_rejected += 1,
            FileStatus::Failed => self.files_failed += 1,
        }
        self.chunks_created += outcome.chunks_created;
        self.chunks_deleted += outcome.chunks_deleted;
        self.outcomes.push(outcome);
    }
}

/// Aggregate results of an orphan cleanup pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Distinct files holding records in the store
    pub files_checked: usize,

    /// Files present in the store but absent from the inventory
    pub files_orphaned: usize,

    /// Records deleted from orphaned files
    pub chunks_deleted: usize,

    /// Ids of the files whose records were removed
    pub files_cleaned: Vec<String>,
}

/// Per-file entry in an [`AnalysisReport`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Source file identity
    pub file_id: String,

    /// Whether the cleaned text passed the validity predicate
    pub is_valid: bool,

    /// Quality score in `[0, 1]`
    pub quality_score: f64,

    /// Word count of the cleaned text
    pub word_count: usize,

    /// Total domain keyword hits
    pub keyword_hits: usize,

    /// Issues found, empty when clean
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// Aggregate results of a validate-only pass (no embedding, no writes)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Files analyzed
    pub files_analyzed: usize,

    /// Files passing the validity predicate
    pub files_valid: usize,

    /// Total characters across valid files
    pub total_text_length: usize,

    /// Total words across valid files
    pub total_words: usize,

    /// Histogram of issues across all files
    pub issue_counts: BTreeMap<String, usize>,

    /// Histogram of keyword category hits across all files
    pub keyword_counts: BTreeMap<String, usize>,

    /// Per-file analyses in inventory order
    pub analyses: Vec<FileAnalysis>,
}

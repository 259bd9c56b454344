//! Per-file processing pipeline.
//!
//! Coordinates the stages a source file passes through on its way to the
//! vector store:
//! 1. Read and preprocess the raw text
//! 2. Validate the document
//! 3. Chunk accepted documents
//! 4. Validate and enrich each chunk
//!
//! The pipeline is deterministic and store-agnostic. The sync engine
//! decides what to do with its output (embed, upsert, skip).

pub mod chunker;
pub mod enrich;
pub mod preprocess;
pub mod validate;
pub mod walker;

pub use chunker::Chunker;
pub use enrich::Enricher;
pub use preprocess::Preprocessor;
pub use validate::{ValidationIssue, ValidationOutcome, Validator};
pub use walker::FileWalker;

use crate::core::error::{BrewsyncError, Result};
use crate::core::presets::ProcessingProfile;
use crate::core::types::{SourceFile, TextChunk};
use std::fs;

/// What the pipeline produced for one file
#[derive(Debug)]
pub enum FileOutput {
    /// The document failed validation and produces no chunks
    Rejected {
        score: f64,
        issues: Vec<ValidationIssue>,
    },
    /// The document was accepted and chunked
    Processed {
        chunks: Vec<TextChunk>,
        chunks_rejected: usize,
        /// Characters of preprocessed text
        text_length: usize,
    },
}

/// The full stage stack for one processing profile
pub struct FilePipeline {
    preprocessor: Preprocessor,
    doc_validator: Validator,
    chunk_validator: Validator,
    chunker: Chunker,
    enricher: Enricher,
}

impl FilePipeline {
    pub fn for_profile(profile: &ProcessingProfile) -> Self {
        Self {
            preprocessor: Preprocessor::new(profile.preprocessing.clone()),
            doc_validator: Validator::for_documents(&profile.chunking),
            chunk_validator: Validator::for_chunks(&profile.chunking),
            chunker: Chunker::new(profile.chunking.clone()),
            enricher: Enricher::new(profile.config_id()),
        }
    }

    pub fn config_id(&self) -> &str {
        self.enricher.config_id()
    }

    /// Read a file from disk and run it through the pipeline.
    ///
    /// Read failures (missing file, non-UTF-8 content) are extraction
    /// errors scoped to this file; they never abort the pass.
    pub fn process_path(&self, file: &SourceFile, processed_at: &str) -> Result<FileOutput> {
        let raw = Self::read_source(file)?;
        Ok(self.process_text(file, &raw, processed_at))
    }

    fn read_source(file: &SourceFile) -> Result<String> {
        fs::read_to_string(&file.path).map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::InvalidData {
                "not valid UTF-8".to_string()
            } else {
                e.to_string()
            };
            BrewsyncError::Extraction {
                path: file.path.display().to_string(),
                message,
            }
        })
    }

    /// Run already-loaded text through the pipeline
    pub fn process_text(&self, file: &SourceFile, raw: &str, processed_at: &str) -> FileOutput {
        let text = self.preprocessor.preprocess(raw);

        let document = self.doc_validator.validate(&text);
        if !document.accepted {
            tracing::debug!(
                file_id = %file.file_id,
                score = document.score,
                issues = ?document.issues,
                "Document rejected"
            );
            return FileOutput::Rejected {
                score: document.score,
                issues: document.issues,
            };
        }

        let text_length = text.chars().count();
        let mut chunks = Vec::new();
        let mut chunks_rejected = 0usize;

        for chunk_text in self.chunker.chunk(&text) {
            let outcome = self.chunk_validator.validate(&chunk_text);
            if !outcome.accepted {
                tracing::debug!(
                    file_id = %file.file_id,
                    score = outcome.score,
                    issues = ?outcome.issues,
                    "Chunk rejected"
                );
                chunks_rejected += 1;
                continue;
            }

            let sequence_index = chunks.len();
            chunks.push(
                self.enricher
                    .enrich(file, sequence_index, chunk_text, &outcome, processed_at),
            );
        }

        FileOutput::Processed {
            chunks,
            chunks_rejected,
            text_length,
        }
    }

    /// Document-level analysis without chunking, for validation passes
    pub fn analyze_document(&self, raw: &str) -> ValidationOutcome {
        let text = self.preprocessor.preprocess(raw);
        self.doc_validator.validate(&text)
    }

    /// Read a file and analyze it without chunking or enrichment
    pub fn analyze_path(&self, file: &SourceFile) -> Result<ValidationOutcome> {
        let raw = Self::read_source(file)?;
        Ok(self.analyze_document(&raw))
    }
}

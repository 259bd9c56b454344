//! UTF-8 safe text chunking.
//!
//! Two modes share one type. Sentence-aware chunking accumulates whole
//! sentences up to the configured size and carries sentence-aligned
//! overlap between adjacent chunks. Character chunking slides a fixed
//! window, the fallback for content without usable sentence structure.
//!
//! All sizes are measured in **characters**, never bytes. Boundaries are
//! computed through `char_indices()`, so multi-byte sequences can never
//! be split mid-character.
//!
//! # Example
//!
//! ```
//! use brewsync::core::presets::{InputConfig, PresetName, ProcessingProfile};
//! use brewsync::core::pipeline::chunker::Chunker;
//!
//! let input = InputConfig {
//!     include_patterns: vec!["*.txt".to_string()],
//!     exclude_patterns: vec![],
//!     max_file_size_mb: 10,
//! };
//! let profile = ProcessingProfile::from_preset(PresetName::FaqContent, input);
//! let chunker = Chunker::new(profile.chunking);
//!
//! let chunks = chunker.chunk("How hot should the mash be? Around 65C works well.");
//! assert_eq!(chunks.len(), 1);
//! ```

use crate::core::presets::ChunkingConfig;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*\s*").unwrap());
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Splits text into ordered chunk texts according to a chunking profile
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// The config must have passed profile validation: non-zero sizes,
    /// `overlap_size < max_chunk_size`.
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Chunk text, returning ordered chunk texts.
    ///
    /// Empty or whitespace-only input yields no chunks. Text shorter than
    /// `max_chunk_size` yields exactly one chunk. Every chunk respects
    /// `max_chunk_size` except when an undersized buffer merges with its
    /// successor rather than close below `min_chunk_size`.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if !self.config.chunk_by_sentences {
            return self.chunk_window(text);
        }

        let mut chunks = Vec::new();
        if self.config.preserve_paragraphs {
            for paragraph in PARAGRAPH_RE.split(text) {
                self.chunk_sentences(paragraph.trim(), &mut chunks);
            }
        } else {
            self.chunk_sentences(text, &mut chunks);
        }
        chunks
    }

    /// Sentence-aware accumulation for one paragraph.
    ///
    /// Overlap never crosses the paragraph boundary because each call
    /// starts with an empty buffer.
    fn chunk_sentences(&self, paragraph: &str, chunks: &mut Vec<String>) {
        let sentences = split_sentences(paragraph);
        if sentences.is_empty() {
            return;
        }

        let max = self.config.max_chunk_size;
        let min = self.config.min_chunk_size;
        let paragraph_start = chunks.len();

        let mut buffer: Vec<String> = Vec::new();
        let mut buffer_len = 0usize;

        for sentence in sentences {
            let sentence_len = sentence.chars().count();

            // A single sentence longer than the limit is hard-split at
            // character level. An undersized buffer merges into it first.
            if sentence_len > max {
                let long_text = if !buffer.is_empty() && buffer_len < min {
                    format!("{} {}", buffer.join(" "), sentence)
                } else {
                    if !buffer.is_empty() {
                        chunks.push(buffer.join(" "));
                    }
                    sentence
                };
                buffer.clear();
                buffer_len = 0;
                chunks.extend(self.chunk_window(&long_text));
                continue;
            }

            let projected = if buffer.is_empty() {
                sentence_len
            } else {
                buffer_len + 1 + sentence_len
            };

            // Close the buffer before it would overflow, unless it is
            // still below min_chunk_size: then the sentence merges in
            // regardless of the limit.
            if !buffer.is_empty() && projected > max && buffer_len >= min {
                self.close_chunk(&mut buffer, &mut buffer_len, chunks);
            }

            buffer_len = if buffer.is_empty() {
                sentence_len
            } else {
                buffer_len + 1 + sentence_len
            };
            buffer.push(sentence);

            if buffer.len() >= self.config.max_sentences_per_chunk {
                self.close_chunk(&mut buffer, &mut buffer_len, chunks);
            }
        }

        if !buffer.is_empty() {
            let tail = buffer.join(" ");
            // Within a paragraph, an undersized tail joins the chunk
            // before it instead of standing alone.
            if buffer_len < min && chunks.len() > paragraph_start {
                if let Some(last) = chunks.last_mut() {
                    last.push(' ');
                    last.push_str(&tail);
                }
            } else {
                chunks.push(tail);
            }
        }
    }

    /// Emit the buffer as a chunk and reseed it with the overlap carried
    /// from the chunk's trailing sentences.
    fn close_chunk(&self, buffer: &mut Vec<String>, buffer_len: &mut usize, chunks: &mut Vec<String>) {
        chunks.push(buffer.join(" "));

        let seed = self.overlap_seed(buffer);
        *buffer = seed;
        *buffer_len = joined_len(buffer);
    }

    /// Trailing sentences of the closed chunk whose joined length fits
    /// within `overlap_size`, in original order. Capped below
    /// `max_sentences_per_chunk` so a seeded buffer cannot close itself.
    fn overlap_seed(&self, closed: &[String]) -> Vec<String> {
        if self.config.overlap_size == 0 {
            return Vec::new();
        }

        let mut seed: Vec<String> = Vec::new();
        let mut total = 0usize;
        for sentence in closed.iter().rev() {
            let added = sentence.chars().count() + if total > 0 { 1 } else { 0 };
            if total + added > self.config.overlap_size {
                break;
            }
            total += added;
            seed.insert(0, sentence.clone());
        }

        let cap = self.config.max_sentences_per_chunk.saturating_sub(1).max(1);
        while seed.len() > cap {
            seed.remove(0);
        }
        seed
    }

    /// Character sliding window with short-tail merge.
    fn chunk_window(&self, text: &str) -> Vec<String> {
        let char_indices: Vec<(usize, char)> = text.char_indices().collect();
        if char_indices.is_empty() {
            return Vec::new();
        }

        let max = self.config.max_chunk_size;
        let step = max.saturating_sub(self.config.overlap_size).max(1);

        // Collect window bounds as character indices first so the tail
        // merge can extend the previous window.
        let mut windows: Vec<(usize, usize)> = Vec::new();
        let mut start = 0usize;
        while start < char_indices.len() {
            let end = (start + max).min(char_indices.len());
            windows.push((start, end));
            if end == char_indices.len() {
                break;
            }
            start += step;
        }

        if windows.len() > 1 {
            let (last_start, last_end) = windows[windows.len() - 1];
            if last_end - last_start < self.config.min_chunk_size {
                windows.pop();
                if let Some(previous) = windows.last_mut() {
                    previous.1 = last_end;
                }
            }
        }

        windows
            .into_iter()
            .map(|(start, end)| {
                let byte_start = char_indices[start].0;
                let byte_end = if end < char_indices.len() {
                    char_indices[end].0
                } else {
                    text.len()
                };
                text[byte_start..byte_end].to_string()
            })
            .collect()
    }
}

/// Split text into sentences, keeping each sentence's terminating
/// punctuation. Trailing text without a terminator counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn joined_len(sentences: &[String]) -> usize {
    if sentences.is_empty() {
        return 0;
    }
    let chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
    chars + sentences.len() - 1
}

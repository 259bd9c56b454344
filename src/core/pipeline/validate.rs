//! Quality validation and scoring.
//!
//! Validation is policy, not failure: a rejected text records its score
//! and issues in the pass report instead of producing an error. Documents
//! are checked against the full predicate including sentence structure;
//! chunks are checked against a lighter predicate floored at
//! `min_chunk_size`, since a legitimate chunk may hold a single sentence.

use crate::core::lexicon::{self, KeywordCategory};
use crate::core::presets::ChunkingConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static SENTENCE_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Minimum meaningful words a text must contain
const MIN_MEANINGFUL_WORDS: usize = 5;
/// Minimum distinct-token ratio before content counts as repetitive
const MIN_DISTINCT_RATIO: f64 = 0.3;
/// Keyword density below this raises `LowDomainRelevance`
const LOW_RELEVANCE_DENSITY: f64 = 0.001;

/// Structural measurements of a text
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    pub char_count: usize,
    pub word_count: usize,
    pub meaningful_words: usize,
    /// Distinct meaningful tokens over total meaningful tokens
    pub distinct_ratio: f64,
    pub keyword_hits: BTreeMap<KeywordCategory, usize>,
    /// Total keyword hits over total words
    pub keyword_density: f64,
    pub sentence_count: usize,
}

impl TextAnalysis {
    pub fn total_keyword_hits(&self) -> usize {
        lexicon::total_hits(&self.keyword_hits)
    }
}

/// Measure a text. Pure and configuration-free.
pub fn analyze(text: &str) -> TextAnalysis {
    let char_count = text.chars().count();
    let word_count = text.split_whitespace().count();

    let text_lower = text.to_lowercase();
    let tokens: Vec<&str> = text_lower
        .split_whitespace()
        .map(lexicon::trim_token)
        .filter(|t| !t.is_empty())
        .collect();

    let meaningful: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| t.chars().count() > 2)
        .filter(|t| t.chars().all(|c| c.is_alphabetic()))
        .filter(|t| !lexicon::is_stopword(t))
        .collect();

    let distinct_ratio = if meaningful.is_empty() {
        0.0
    } else {
        let distinct: std::collections::HashSet<&str> = meaningful.iter().copied().collect();
        distinct.len() as f64 / meaningful.len() as f64
    };

    let keyword_hits = lexicon::keyword_hits(&text_lower, &tokens);
    let keyword_density = if word_count == 0 {
        0.0
    } else {
        lexicon::total_hits(&keyword_hits) as f64 / word_count as f64
    };

    let sentence_count = SENTENCE_BOUNDARY_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();

    TextAnalysis {
        char_count,
        word_count,
        meaningful_words: meaningful.len(),
        distinct_ratio,
        keyword_hits,
        keyword_density,
        sentence_count,
    }
}

/// Reasons a text fails or loses score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    TooShort,
    TooLong,
    InsufficientMeaningfulWords,
    RepetitiveContent,
    InsufficientSentences,
    LowDomainRelevance,
}

impl ValidationIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InsufficientMeaningfulWords => "insufficient_meaningful_words",
            Self::RepetitiveContent => "repetitive_content",
            Self::InsufficientSentences => "insufficient_sentences",
            Self::LowDomainRelevance => "low_domain_relevance",
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of validating one text
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Structural validity, independent of the quality threshold
    pub is_valid: bool,
    /// Valid and scoring at or above the profile's threshold
    pub accepted: bool,
    /// Quality score in [0, 1]
    pub score: f64,
    pub issues: Vec<ValidationIssue>,
    pub analysis: TextAnalysis,
}

/// Validity rules and scoring for one profile
#[derive(Debug, Clone)]
pub struct Validator {
    min_chars: usize,
    max_chars: usize,
    quality_threshold: f64,
    require_sentences: bool,
}

impl Validator {
    /// Document-level rules: full predicate including sentence structure
    pub fn for_documents(config: &ChunkingConfig) -> Self {
        Self {
            min_chars: config.min_text_length,
            max_chars: config.max_text_length,
            quality_threshold: config.quality_threshold,
            require_sentences: true,
        }
    }

    /// Chunk-level rules: floored at `min_chunk_size`, no sentence gate
    pub fn for_chunks(config: &ChunkingConfig) -> Self {
        Self {
            min_chars: config.min_chunk_size,
            max_chars: config.max_text_length,
            quality_threshold: config.quality_threshold,
            require_sentences: false,
        }
    }

    pub fn validate(&self, text: &str) -> ValidationOutcome {
        let analysis = analyze(text);
        let mut issues = Vec::new();

        if analysis.char_count < self.min_chars {
            issues.push(ValidationIssue::TooShort);
        }
        if analysis.char_count > self.max_chars {
            issues.push(ValidationIssue::TooLong);
        }
        if analysis.meaningful_words < MIN_MEANINGFUL_WORDS {
            issues.push(ValidationIssue::InsufficientMeaningfulWords);
        }
        if analysis.meaningful_words >= MIN_MEANINGFUL_WORDS
            && analysis.distinct_ratio < MIN_DISTINCT_RATIO
        {
            issues.push(ValidationIssue::RepetitiveContent);
        }
        if self.require_sentences && analysis.sentence_count < 2 {
            issues.push(ValidationIssue::InsufficientSentences);
        }
        if analysis.keyword_density < LOW_RELEVANCE_DENSITY {
            issues.push(ValidationIssue::LowDomainRelevance);
        }

        // Relevance lowers the score but never structural validity
        let is_valid = issues
            .iter()
            .all(|issue| matches!(issue, ValidationIssue::LowDomainRelevance));

        let score = score(&analysis, is_valid, issues.len());
        let accepted = is_valid && score >= self.quality_threshold;

        ValidationOutcome {
            is_valid,
            accepted,
            score,
            issues,
            analysis,
        }
    }
}

/// Quality score in [0, 1].
///
/// Weights: validity 0.30, length adequacy 0.20, keyword density 0.30,
/// sentence structure 0.10, minus an issue penalty capped at 0.10.
/// Non-decreasing in keyword density when everything else is fixed.
fn score(analysis: &TextAnalysis, is_valid: bool, issue_count: usize) -> f64 {
    let mut score = 0.0;

    if is_valid {
        score += 0.3;
    }

    if (100..=5000).contains(&analysis.word_count) {
        score += 0.2;
    } else if analysis.word_count > 5000 {
        score += 0.1;
    }

    if analysis.keyword_density >= 0.01 {
        score += 0.3;
    } else if analysis.keyword_density >= 0.005 {
        score += 0.2;
    }

    if analysis.sentence_count > 5 {
        score += 0.1;
    }

    score -= (0.1 * issue_count as f64).min(0.1);

    score.clamp(0.0, 1.0)
}

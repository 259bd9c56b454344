//! Text preprocessing applied before validation and chunking.
//!
//! Every operation is toggled by the profile's `PreprocessConfig`.
//! Preprocessing is deterministic and side-effect free: the same input
//! and configuration always produce the same output, and empty input
//! produces empty output rather than an error.

use crate::core::lexicon::is_stopword;
use crate::core::presets::PreprocessConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPECIAL_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:\-()\[\]{}]").unwrap());
static SENTENCE_PUNCT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]{2,}").unwrap());
static CLAUSE_PUNCT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:]{2,}").unwrap());
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Configurable text preprocessor
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Run the configured preprocessing stages over the text
    pub fn preprocess(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut text = if self.config.clean_text {
            self.clean(text)
        } else {
            text.to_string()
        };

        if self.config.lowercase {
            text = text.to_lowercase();
        }

        if self.config.remove_numbers {
            text = DIGITS_RE.replace_all(&text, "").to_string();
            text = collapse_whitespace(&text);
        }

        if self.config.remove_punctuation {
            text = PUNCT_RE.replace_all(&text, "").to_string();
            text = collapse_whitespace(&text);
        }

        if self.config.remove_stopwords {
            text = text
                .split_whitespace()
                .filter(|token| !is_stopword(token.to_lowercase().as_str()))
                .collect::<Vec<_>>()
                .join(" ");
        }

        if self.config.lemmatize {
            text = text
                .split_whitespace()
                .map(|token| STEMMER.stem(&token.to_lowercase()).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
        }

        text
    }

    /// Normalization, whitespace collapse and noise removal.
    ///
    /// Keeps the punctuation sentence splitting depends on and collapses
    /// runs of repeated punctuation, which OCR output is full of.
    fn clean(&self, text: &str) -> String {
        let mut text = if self.config.normalize_unicode {
            text.nfkc().collect::<String>()
        } else {
            text.to_string()
        };

        text = collapse_whitespace(&text);

        if self.config.remove_special_chars {
            text = SPECIAL_CHARS_RE.replace_all(&text, "").to_string();
            text = SENTENCE_PUNCT_RUN_RE.replace_all(&text, ".").to_string();
            text = CLAUSE_PUNCT_RUN_RE.replace_all(&text, ",").to_string();
            // Removed characters can leave doubled spaces behind
            text = collapse_whitespace(&text);
        }

        text
    }
}

/// Collapse whitespace runs to single spaces while keeping blank-line
/// paragraph breaks, which the chunker splits on.
fn collapse_whitespace(text: &str) -> String {
    PARAGRAPH_BREAK_RE
        .split(text.trim())
        .map(|paragraph| WHITESPACE_RE.replace_all(paragraph.trim(), " "))
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

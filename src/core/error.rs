//! Error types and error handling for the brewsync engine.
//!
//! This module defines the error types used throughout the
//! application. Validation rejections are deliberately not errors:
//! they are policy outcomes carried in the pipeline types and the
//! per-pass reports.

use thiserror::Error;

/// Result type alias for brewsync operations
pub type Result<T> = std::result::Result<T, BrewsyncError>;

/// Main error type for the brewsync engine
#[derive(Error, Debug)]
pub enum BrewsyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown preset '{name}'. Valid presets: {}", .valid.join(", "))]
    UnknownPreset { name: String, valid: Vec<String> },

    #[error("Extraction failed for {path}: {message}")]
    Extraction { path: String, message: String },

    #[error("Embedding service error: {message}")]
    EmbeddingService { message: String, retryable: bool },

    #[error("Vector store error: {message}")]
    VectorStore { message: String, retryable: bool },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl BrewsyncError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a fatal configuration error (aborts before any
    /// file is touched)
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BrewsyncError::ConfigError(_) | BrewsyncError::UnknownPreset { .. }
        )
    }

    /// Check if this failure is retryable with backoff (transient
    /// gateway trouble rather than bad input)
    pub fn is_retryable(&self) -> bool {
        match self {
            BrewsyncError::EmbeddingService { retryable, .. }
            | BrewsyncError::VectorStore { retryable, .. } => *retryable,
            BrewsyncError::HttpError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if this failure is scoped to a single file (logged and
    /// skipped, never aborting the pass)
    pub fn is_per_file(&self) -> bool {
        matches!(self, BrewsyncError::Extraction { .. })
    }
}

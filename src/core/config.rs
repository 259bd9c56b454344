//! Configuration management for the brewsync engine.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Per-file processing profiles (presets + overrides) are resolved
//! separately in [`crate::core::presets`]; this is the application
//! level configuration: watched roots, gateways, and engine knobs.

use crate::core::error::{BrewsyncError, Result};
use crate::core::presets::{Overrides, PresetName};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub processing: ProcessingSettings,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Watched roots and file discovery settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Directory of speech-to-text transcripts
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: PathBuf,

    /// Directory of OCR text extracted from presentations
    #[serde(default = "default_ocr_texts_dir")]
    pub ocr_texts_dir: PathBuf,

    /// Optional directory of hand-written manuals
    #[serde(default)]
    pub manuals_dir: Option<PathBuf>,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

/// Engine-level processing settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessingSettings {
    /// Preset used when smart selection is off or has no mapping
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Select presets automatically from content type
    #[serde(default = "default_smart_selection")]
    pub smart_selection: bool,

    /// Bounded worker pool size for file-level pipeline work
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Chunks per embedding/upsert batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Retry attempts for embedding and store calls
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Quality threshold override; presets carry their own default
    #[serde(default)]
    pub quality_threshold: Option<f64>,

    /// Field-level overrides applied on top of the resolved preset
    #[serde(default)]
    pub overrides: Overrides,
}

/// Embedding service client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible embeddings endpoint
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// Model name sent with each request
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Expected vector dimension
    #[serde(default = "default_dims")]
    pub dims: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,

    /// Bearer token, if the endpoint requires one
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Vector store client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Qdrant base URL
    #[serde(default = "default_store_url")]
    pub url: String,

    /// API key header value, if the deployment requires one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection holding the chunk points
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Vector size the collection is created with
    #[serde(default = "default_dims")]
    pub vector_size: usize,

    /// Distance metric: cosine, dot, or euclid
    #[serde(default = "default_distance")]
    pub distance: String,

    /// Request timeout in seconds
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_transcripts_dir() -> PathBuf {
    PathBuf::from("data/transcripts")
}

fn default_ocr_texts_dir() -> PathBuf {
    PathBuf::from("data/presentation_texts")
}

fn default_include_patterns() -> Vec<String> {
    vec!["*.txt".to_string()]
}

fn default_max_file_size() -> usize {
    10
}

fn default_preset() -> String {
    "general_brewing".to_string()
}

fn default_smart_selection() -> bool {
    true
}

fn default_max_workers() -> usize {
    4
}

fn default_batch_size() -> usize {
    32
}

fn default_max_retries() -> u32 {
    3
}

fn default_embedding_endpoint() -> String {
    "http://localhost:8080/v1/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_dims() -> usize {
    384
}

fn default_embedding_timeout() -> u64 {
    300
}

fn default_store_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "brewsync".to_string()
}

fn default_distance() -> String {
    "cosine".to_string()
}

fn default_store_timeout() -> u64 {
    30
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            transcripts_dir: default_transcripts_dir(),
            ocr_texts_dir: default_ocr_texts_dir(),
            manuals_dir: None,
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            smart_selection: default_smart_selection(),
            max_workers: default_max_workers(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            quality_threshold: None,
            overrides: Overrides::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dims: default_dims(),
            timeout_secs: default_embedding_timeout(),
            api_key: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            api_key: None,
            collection: default_collection(),
            vector_size: default_dims(),
            distance: default_distance(),
            timeout_secs: default_store_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BrewsyncError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. BREWSYNC_CONFIG env var
    /// 2. XDG config file (~/.config/brewsync/config.toml)
    /// 3. Legacy ./brewsync.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("BREWSYNC_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("brewsync.toml").exists() {
                Self::from_file("brewsync.toml")?
            } else {
                Self::default()
            }
        };

        // Override with environment variables
        config.merge_env();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Processing configuration
        if let Ok(preset) = env::var("BREWSYNC_DEFAULT_PRESET") {
            self.processing.default_preset = preset;
        }
        if let Ok(workers) = env::var("BREWSYNC_MAX_WORKERS") {
            if let Ok(n) = workers.parse() {
                self.processing.max_workers = n;
            }
        }
        if let Ok(batch) = env::var("BREWSYNC_BATCH_SIZE") {
            if let Ok(n) = batch.parse() {
                self.processing.batch_size = n;
            }
        }
        if let Ok(threshold) = env::var("BREWSYNC_QUALITY_THRESHOLD") {
            if let Ok(t) = threshold.parse() {
                self.processing.quality_threshold = Some(t);
            }
        }

        // Embedding configuration
        if let Ok(endpoint) = env::var("BREWSYNC_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = endpoint;
        }
        if let Ok(key) = env::var("BREWSYNC_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(key);
        }

        // Store configuration
        if let Ok(url) = env::var("BREWSYNC_STORE_URL") {
            self.store.url = url;
        }
        if let Ok(key) = env::var("BREWSYNC_STORE_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Ok(collection) = env::var("BREWSYNC_COLLECTION") {
            self.store.collection = collection;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate ingest config
        if self.ingest.max_file_size_mb == 0 {
            return Err(BrewsyncError::ConfigError(
                "Max file size must be non-zero".to_string(),
            ));
        }

        // Validate processing config
        PresetName::parse(&self.processing.default_preset)?;

        if self.processing.max_workers == 0 {
            return Err(BrewsyncError::ConfigError(
                "Max workers must be non-zero".to_string(),
            ));
        }

        if self.processing.batch_size == 0 {
            return Err(BrewsyncError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        if let Some(threshold) = self.processing.quality_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(BrewsyncError::ConfigError(format!(
                    "Quality threshold must be within [0, 1], got {threshold}"
                )));
            }
        }

        // Validate gateway config
        if self.embedding.dims == 0 {
            return Err(BrewsyncError::ConfigError(
                "Embedding dimension must be non-zero".to_string(),
            ));
        }

        if self.embedding.dims != self.store.vector_size {
            return Err(BrewsyncError::ConfigError(format!(
                "Embedding dimension {} does not match collection vector size {}",
                self.embedding.dims, self.store.vector_size
            )));
        }

        if !matches!(self.store.distance.as_str(), "cosine" | "dot" | "euclid") {
            return Err(BrewsyncError::ConfigError(format!(
                "Unknown distance metric '{}' (expected cosine, dot, or euclid)",
                self.store.distance
            )));
        }

        Ok(())
    }

    /// Watched roots paired with their content types, in scan order.
    /// Missing optional roots are excluded here, not at walk time.
    pub fn watched_roots(&self) -> Vec<(PathBuf, crate::core::types::ContentType)> {
        use crate::core::types::ContentType;

        let mut roots = vec![
            (self.ingest.transcripts_dir.clone(), ContentType::Transcript),
            (self.ingest.ocr_texts_dir.clone(), ContentType::Ocr),
        ];
        if let Some(manuals) = &self.ingest.manuals_dir {
            roots.push((manuals.clone(), ContentType::Manual));
        }
        roots
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Transcripts dir: {:?}", self.ingest.transcripts_dir);
        tracing::info!("  OCR texts dir: {:?}", self.ingest.ocr_texts_dir);
        if let Some(manuals) = &self.ingest.manuals_dir {
            tracing::info!("  Manuals dir: {:?}", manuals);
        }
        tracing::info!("  Max file size: {} MB", self.ingest.max_file_size_mb);
        tracing::info!("  Default preset: {}", self.processing.default_preset);
        tracing::info!("  Smart selection: {}", self.processing.smart_selection);
        tracing::info!("  Max workers: {}", self.processing.max_workers);
        tracing::info!("  Batch size: {}", self.processing.batch_size);
        tracing::info!("  Embedding endpoint: {}", self.embedding.endpoint);
        tracing::info!("  Embedding model: {}", self.embedding.model);
        tracing::info!("  Embedding dims: {}", self.embedding.dims);
        tracing::info!(
            "  Embedding api key: {}",
            if self.embedding.api_key.is_some() {
                "[set]"
            } else {
                "[unset]"
            }
        );
        tracing::info!("  Store url: {}", self.store.url);
        tracing::info!("  Collection: {}", self.store.collection);
        tracing::info!("  Vector size: {}", self.store.vector_size);
        tracing::info!("  Distance: {}", self.store.distance);
    }
}

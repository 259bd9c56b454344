//! Named processing presets and profile resolution.
//!
//! A `ProcessingProfile` is the full three-stage configuration a file is
//! processed under: input constraints, preprocessing toggles, and chunking
//! geometry. Profiles are built from a closed catalog of named presets,
//! optionally adjusted by field-level overrides, and identified by a
//! `config_id` that changes whenever any content-affecting field changes.

use crate::core::config::{Config, IngestConfig};
use crate::core::error::{BrewsyncError, Result};
use crate::core::types::ContentType;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Names of the built-in processing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetName {
    VideoTranscript,
    PresentationText,
    TechnicalBrewing,
    GeneralBrewing,
    RecipeContent,
    FaqContent,
    HistoricalContent,
    EquipmentSpecs,
    HighQuality,
    Balanced,
    FastProcessing,
}

/// All presets, in catalog order
pub const ALL_PRESETS: [PresetName; 11] = [
    PresetName::VideoTranscript,
    PresetName::PresentationText,
    PresetName::TechnicalBrewing,
    PresetName::GeneralBrewing,
    PresetName::RecipeContent,
    PresetName::FaqContent,
    PresetName::HistoricalContent,
    PresetName::EquipmentSpecs,
    PresetName::HighQuality,
    PresetName::Balanced,
    PresetName::FastProcessing,
];

impl PresetName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VideoTranscript => "video_transcript",
            Self::PresentationText => "presentation_text",
            Self::TechnicalBrewing => "technical_brewing",
            Self::GeneralBrewing => "general_brewing",
            Self::RecipeContent => "recipe_content",
            Self::FaqContent => "faq_content",
            Self::HistoricalContent => "historical_content",
            Self::EquipmentSpecs => "equipment_specs",
            Self::HighQuality => "high_quality",
            Self::Balanced => "balanced",
            Self::FastProcessing => "fast_processing",
        }
    }

    /// Parse a preset name, rejecting unknown names outright
    pub fn parse(name: &str) -> Result<Self> {
        ALL_PRESETS
            .iter()
            .find(|p| p.as_str() == name)
            .copied()
            .ok_or_else(|| BrewsyncError::UnknownPreset {
                name: name.to_string(),
                valid: ALL_PRESETS.iter().map(|p| p.as_str().to_string()).collect(),
            })
    }

    /// Preset selected for a content type when smart selection is on
    pub fn for_content_type(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Transcript => Self::VideoTranscript,
            ContentType::Ocr => Self::PresentationText,
            ContentType::Manual => Self::GeneralBrewing,
        }
    }

    /// One-line description shown by `brewsync config --list`
    pub fn describe(&self) -> &'static str {
        match self {
            Self::VideoTranscript => "Long-form speech transcripts (large chunks, wide overlap)",
            Self::PresentationText => "OCR text from slides (small chunks, fragmented input)",
            Self::TechnicalBrewing => "Technical articles with process detail",
            Self::GeneralBrewing => "General brewing content (default)",
            Self::RecipeContent => "Recipes kept whole (largest chunks)",
            Self::FaqContent => "Short question/answer pairs",
            Self::HistoricalContent => "Historical and narrative material",
            Self::EquipmentSpecs => "Equipment specifications and data sheets",
            Self::HighQuality => "Quality profile favoring cohesive chunks",
            Self::Balanced => "Quality profile matching the default preset",
            Self::FastProcessing => "Quality profile favoring throughput",
        }
    }
}

impl std::fmt::Display for PresetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input-stage constraints, carried over from the ingest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_file_size_mb: usize,
}

impl From<&IngestConfig> for InputConfig {
    fn from(ingest: &IngestConfig) -> Self {
        Self {
            include_patterns: ingest.include_patterns.clone(),
            exclude_patterns: ingest.exclude_patterns.clone(),
            max_file_size_mb: ingest.max_file_size_mb,
        }
    }
}

/// Preprocessing toggles applied before validation and chunking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub clean_text: bool,
    pub normalize_unicode: bool,
    pub remove_special_chars: bool,
    pub lowercase: bool,
    pub remove_stopwords: bool,
    pub lemmatize: bool,
    pub remove_numbers: bool,
    pub remove_punctuation: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            clean_text: true,
            normalize_unicode: true,
            remove_special_chars: true,
            lowercase: true,
            remove_stopwords: false,
            lemmatize: false,
            remove_numbers: false,
            remove_punctuation: false,
        }
    }
}

/// Chunking geometry plus the validation bounds tied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chunk_size: usize,
    /// Chunks below this size merge into a neighbor
    pub min_chunk_size: usize,
    /// Overlap carried between adjacent chunks, in characters
    pub overlap_size: usize,
    /// Hard cap on sentences per chunk
    pub max_sentences_per_chunk: usize,
    /// Accumulate whole sentences instead of sliding a character window
    pub chunk_by_sentences: bool,
    /// Split on blank lines first and never overlap across them
    pub preserve_paragraphs: bool,
    /// Documents shorter than this (in characters) are rejected
    pub min_text_length: usize,
    /// Documents longer than this (in characters) are rejected
    pub max_text_length: usize,
    /// Minimum quality score an accepted document must reach
    pub quality_threshold: f64,
}

const DEFAULT_QUALITY_THRESHOLD: f64 = 0.25;

impl ChunkingConfig {
    fn content(
        max: usize,
        min: usize,
        overlap: usize,
        max_sentences: usize,
        min_text: usize,
        max_text: usize,
    ) -> Self {
        Self {
            max_chunk_size: max,
            min_chunk_size: min,
            overlap_size: overlap,
            max_sentences_per_chunk: max_sentences,
            chunk_by_sentences: true,
            preserve_paragraphs: true,
            min_text_length: min_text,
            max_text_length: max_text,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
        }
    }
}

/// A fully resolved processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingProfile {
    pub preset: PresetName,
    pub input: InputConfig,
    pub preprocessing: PreprocessConfig,
    pub chunking: ChunkingConfig,
}

impl ProcessingProfile {
    /// Pristine profile for a preset, before any overrides
    pub fn from_preset(preset: PresetName, input: InputConfig) -> Self {
        let (preprocessing, chunking) = preset_stages(preset);
        Self {
            preset,
            input,
            preprocessing,
            chunking,
        }
    }

    /// Stable identifier for the content-affecting part of this profile.
    ///
    /// An untouched preset keeps its bare name. Any altered preprocessing or
    /// chunking field yields `<preset>+<digest>` so records written under
    /// different effective configurations never collide. Input constraints
    /// steer discovery only and are excluded.
    pub fn config_id(&self) -> String {
        let (pristine_pre, pristine_chunk) = preset_stages(self.preset);
        if self.preprocessing == pristine_pre && self.chunking == pristine_chunk {
            return self.preset.as_str().to_string();
        }

        let mut hasher = Sha256::new();
        hasher.update(self.preset.as_str().as_bytes());
        // Struct field order is fixed, so this serialization is stable.
        if let Ok(encoded) = serde_json::to_vec(&(&self.preprocessing, &self.chunking)) {
            hasher.update(&encoded);
        }
        let digest = hex::encode(hasher.finalize());
        format!("{}+{}", self.preset.as_str(), &digest[..8])
    }

    /// Reject geometrically impossible profiles
    pub fn validate(&self) -> Result<()> {
        let c = &self.chunking;
        if c.max_chunk_size == 0 {
            return Err(BrewsyncError::ConfigError(
                "max_chunk_size must be non-zero".to_string(),
            ));
        }
        if c.min_chunk_size > c.max_chunk_size {
            return Err(BrewsyncError::ConfigError(format!(
                "min_chunk_size {} exceeds max_chunk_size {}",
                c.min_chunk_size, c.max_chunk_size
            )));
        }
        if c.overlap_size >= c.max_chunk_size {
            return Err(BrewsyncError::ConfigError(format!(
                "overlap_size {} must be smaller than max_chunk_size {}",
                c.overlap_size, c.max_chunk_size
            )));
        }
        if c.max_sentences_per_chunk == 0 {
            return Err(BrewsyncError::ConfigError(
                "max_sentences_per_chunk must be non-zero".to_string(),
            ));
        }
        if c.min_text_length > c.max_text_length {
            return Err(BrewsyncError::ConfigError(format!(
                "min_text_length {} exceeds max_text_length {}",
                c.min_text_length, c.max_text_length
            )));
        }
        if !(0.0..=1.0).contains(&c.quality_threshold) {
            return Err(BrewsyncError::ConfigError(format!(
                "quality_threshold must be within [0, 1], got {}",
                c.quality_threshold
            )));
        }
        Ok(())
    }
}

/// Preprocessing and chunking stages for a preset
fn preset_stages(preset: PresetName) -> (PreprocessConfig, ChunkingConfig) {
    let preprocessing = PreprocessConfig::default();
    match preset {
        PresetName::VideoTranscript => (
            preprocessing,
            ChunkingConfig::content(1500, 200, 300, 15, 100, 15000),
        ),
        PresetName::PresentationText => (
            preprocessing,
            ChunkingConfig::content(800, 150, 150, 8, 75, 8000),
        ),
        PresetName::TechnicalBrewing => (
            preprocessing,
            ChunkingConfig::content(1200, 200, 250, 12, 100, 12000),
        ),
        PresetName::GeneralBrewing | PresetName::Balanced => (
            preprocessing,
            ChunkingConfig::content(1000, 150, 200, 10, 75, 10000),
        ),
        PresetName::RecipeContent => (
            preprocessing,
            ChunkingConfig::content(2000, 300, 400, 20, 150, 20000),
        ),
        PresetName::FaqContent => (
            preprocessing,
            ChunkingConfig::content(600, 100, 100, 6, 50, 5000),
        ),
        PresetName::HistoricalContent => (
            preprocessing,
            ChunkingConfig::content(1800, 250, 350, 18, 125, 18000),
        ),
        PresetName::EquipmentSpecs => (
            preprocessing,
            ChunkingConfig::content(1000, 200, 200, 10, 100, 10000),
        ),
        PresetName::HighQuality => (
            preprocessing,
            ChunkingConfig::content(1200, 200, 250, 12, 100, 12000),
        ),
        PresetName::FastProcessing => {
            let preprocessing = PreprocessConfig {
                remove_stopwords: true,
                ..PreprocessConfig::default()
            };
            let chunking = ChunkingConfig {
                chunk_by_sentences: false,
                preserve_paragraphs: false,
                ..ChunkingConfig::content(800, 100, 100, 8, 50, 8000)
            };
            (preprocessing, chunking)
        }
    }
}

/// Field-level overrides applied on top of a resolved preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overrides {
    pub max_chunk_size: Option<usize>,
    pub min_chunk_size: Option<usize>,
    pub overlap_size: Option<usize>,
    pub max_sentences_per_chunk: Option<usize>,
    pub chunk_by_sentences: Option<bool>,
    pub preserve_paragraphs: Option<bool>,
    pub min_text_length: Option<usize>,
    pub max_text_length: Option<usize>,
    pub quality_threshold: Option<f64>,
    pub clean_text: Option<bool>,
    pub lowercase: Option<bool>,
    pub remove_stopwords: Option<bool>,
    pub lemmatize: Option<bool>,
    pub remove_numbers: Option<bool>,
    pub remove_punctuation: Option<bool>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every set field onto the profile
    pub fn apply(&self, profile: &mut ProcessingProfile) {
        let c = &mut profile.chunking;
        if let Some(v) = self.max_chunk_size {
            c.max_chunk_size = v;
        }
        if let Some(v) = self.min_chunk_size {
            c.min_chunk_size = v;
        }
        if let Some(v) = self.overlap_size {
            c.overlap_size = v;
        }
        if let Some(v) = self.max_sentences_per_chunk {
            c.max_sentences_per_chunk = v;
        }
        if let Some(v) = self.chunk_by_sentences {
            c.chunk_by_sentences = v;
        }
        if let Some(v) = self.preserve_paragraphs {
            c.preserve_paragraphs = v;
        }
        if let Some(v) = self.min_text_length {
            c.min_text_length = v;
        }
        if let Some(v) = self.max_text_length {
            c.max_text_length = v;
        }
        if let Some(v) = self.quality_threshold {
            c.quality_threshold = v;
        }

        let p = &mut profile.preprocessing;
        if let Some(v) = self.clean_text {
            p.clean_text = v;
        }
        if let Some(v) = self.lowercase {
            p.lowercase = v;
        }
        if let Some(v) = self.remove_stopwords {
            p.remove_stopwords = v;
        }
        if let Some(v) = self.lemmatize {
            p.lemmatize = v;
        }
        if let Some(v) = self.remove_numbers {
            p.remove_numbers = v;
        }
        if let Some(v) = self.remove_punctuation {
            p.remove_punctuation = v;
        }
    }
}

/// Resolves the processing profile for each file.
///
/// Resolution order: override fields > explicit preset > smart-selected
/// preset keyed by content type > default preset.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    default_preset: PresetName,
    smart_selection: bool,
    overrides: Overrides,
    input: InputConfig,
}

impl ConfigResolver {
    pub fn from_config(config: &Config) -> Result<Self> {
        let default_preset = PresetName::parse(&config.processing.default_preset)?;

        let mut overrides = config.processing.overrides.clone();
        // [processing].quality_threshold covers the common case without a
        // full overrides table; an explicit override still wins.
        if overrides.quality_threshold.is_none() {
            overrides.quality_threshold = config.processing.quality_threshold;
        }

        let resolver = Self {
            default_preset,
            smart_selection: config.processing.smart_selection,
            overrides,
            input: InputConfig::from(&config.ingest),
        };

        // Surface contradictory overrides before a pass touches any file.
        for preset in ALL_PRESETS {
            resolver.resolve_preset(preset)?;
        }

        Ok(resolver)
    }

    /// Profile for a file of the given content type
    pub fn resolve(&self, content_type: ContentType) -> Result<ProcessingProfile> {
        let preset = if self.smart_selection {
            PresetName::for_content_type(content_type)
        } else {
            self.default_preset
        };
        self.resolve_preset(preset)
    }

    /// Profile for an explicitly named preset
    pub fn resolve_named(&self, name: &str) -> Result<ProcessingProfile> {
        self.resolve_preset(PresetName::parse(name)?)
    }

    /// Profile used when no content type applies (walker input stage)
    pub fn default_profile(&self) -> Result<ProcessingProfile> {
        self.resolve_preset(self.default_preset)
    }

    fn resolve_preset(&self, preset: PresetName) -> Result<ProcessingProfile> {
        let mut profile = ProcessingProfile::from_preset(preset, self.input.clone());
        self.overrides.apply(&mut profile);
        profile.validate()?;
        Ok(profile)
    }
}

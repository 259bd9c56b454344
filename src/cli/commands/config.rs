//! Config command - inspect presets and the effective configuration

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::presets::{ConfigResolver, ProcessingProfile, ALL_PRESETS};
use crate::core::types::ContentType;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show one preset's fully resolved profile (with overrides applied)
    pub preset: Option<String>,

    /// List the preset catalog
    #[arg(long, short = 'l')]
    pub list: bool,
}

/// Effective configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub ingest: IngestSummary,
    pub processing: ProcessingSummary,
    pub embedding: EmbeddingSummary,
    pub store: StoreSummary,
    pub content_types: Vec<ContentTypeBinding>,
}

#[derive(Debug, Serialize)]
pub struct IngestSummary {
    pub transcripts_dir: String,
    pub ocr_texts_dir: String,
    pub manuals_dir: Option<String>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub max_file_size_mb: usize,
}

#[derive(Debug, Serialize)]
pub struct ProcessingSummary {
    pub default_preset: String,
    pub smart_selection: bool,
    pub max_workers: usize,
    pub batch_size: usize,
    pub max_retries: u32,
    pub quality_threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingSummary {
    pub endpoint: String,
    pub model: String,
    pub dims: usize,
    pub api_key: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub url: String,
    pub collection: String,
    pub vector_size: usize,
    pub distance: String,
    pub api_key: &'static str,
}

/// One row of the smart-selection table
#[derive(Debug, Serialize)]
pub struct ContentTypeBinding {
    pub content_type: String,
    pub preset: String,
    pub config_id: String,
}

/// A preset resolved against the current overrides
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub description: String,
    pub config_id: String,
    #[serde(flatten)]
    pub profile: ProcessingProfile,
}

#[derive(Debug, Serialize)]
pub struct PresetListItem {
    pub name: String,
    pub description: String,
}

fn masked(key: &Option<String>) -> &'static str {
    if key.is_some() {
        "[set]"
    } else {
        "[unset]"
    }
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    if args.list {
        return list_presets(format);
    }
    if let Some(name) = &args.preset {
        return show_profile(name, config, format);
    }
    show_effective(config, format)
}

fn list_presets(format: OutputFormat) -> Result<i32, Box<dyn std::error::Error>> {
    let items: Vec<PresetListItem> = ALL_PRESETS
        .iter()
        .map(|p| PresetListItem {
            name: p.as_str().to_string(),
            description: p.describe().to_string(),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            output::print_header("Presets:");
            for item in &items {
                println!(
                    "  {:<20} {}",
                    colors::file_id(&item.name),
                    colors::dim(&item.description)
                );
            }
        }
        OutputFormat::Json => output::print_json(&items)?,
    }
    Ok(0)
}

fn show_profile(
    name: &str,
    config: &Config,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let resolver = ConfigResolver::from_config(config)?;
    let profile = resolver.resolve_named(name)?;

    let response = ProfileResponse {
        name: profile.preset.as_str().to_string(),
        description: profile.preset.describe().to_string(),
        config_id: profile.config_id(),
        profile,
    };

    match format {
        OutputFormat::Text => {
            println!(
                "{}: {}",
                colors::label("Preset"),
                colors::file_id(&response.name)
            );
            println!("  {}", colors::dim(&response.description));
            println!(
                "  {}: {}",
                colors::label("config id"),
                colors::file_id(&response.config_id)
            );

            let c = &response.profile.chunking;
            output::print_header("Chunking:");
            println!("  max_chunk_size:          {}", c.max_chunk_size);
            println!("  min_chunk_size:          {}", c.min_chunk_size);
            println!("  overlap_size:            {}", c.overlap_size);
            println!("  max_sentences_per_chunk: {}", c.max_sentences_per_chunk);
            println!("  chunk_by_sentences:      {}", c.chunk_by_sentences);
            println!("  preserve_paragraphs:     {}", c.preserve_paragraphs);
            println!("  min_text_length:         {}", c.min_text_length);
            println!("  max_text_length:         {}", c.max_text_length);
            println!("  quality_threshold:       {}", c.quality_threshold);

            let p = &response.profile.preprocessing;
            output::print_header("Preprocessing:");
            println!("  clean_text:           {}", p.clean_text);
            println!("  normalize_unicode:    {}", p.normalize_unicode);
            println!("  remove_special_chars: {}", p.remove_special_chars);
            println!("  lowercase:            {}", p.lowercase);
            println!("  remove_stopwords:     {}", p.remove_stopwords);
            println!("  lemmatize:            {}", p.lemmatize);
            println!("  remove_numbers:       {}", p.remove_numbers);
            println!("  remove_punctuation:   {}", p.remove_punctuation);
        }
        OutputFormat::Json => output::print_json(&response)?,
    }
    Ok(0)
}

fn show_effective(
    config: &Config,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let xdg = crate::core::xdg::XdgDirs::new();
    let resolver = ConfigResolver::from_config(config)?;

    let content_types = [ContentType::Transcript, ContentType::Ocr, ContentType::Manual]
        .into_iter()
        .map(|ct| {
            let profile = resolver.resolve(ct)?;
            Ok(ContentTypeBinding {
                content_type: ct.as_str().to_string(),
                preset: profile.preset.as_str().to_string(),
                config_id: profile.config_id(),
            })
        })
        .collect::<crate::core::error::Result<Vec<_>>>()?;

    let response = ConfigResponse {
        config_file: xdg.config_file().display().to_string(),
        ingest: IngestSummary {
            transcripts_dir: config.ingest.transcripts_dir.display().to_string(),
            ocr_texts_dir: config.ingest.ocr_texts_dir.display().to_string(),
            manuals_dir: config
                .ingest
                .manuals_dir
                .as_ref()
                .map(|p| p.display().to_string()),
            include_patterns: config.ingest.include_patterns.clone(),
            exclude_patterns: config.ingest.exclude_patterns.clone(),
            max_file_size_mb: config.ingest.max_file_size_mb,
        },
        processing: ProcessingSummary {
            default_preset: config.processing.default_preset.clone(),
            smart_selection: config.processing.smart_selection,
            max_workers: config.processing.max_workers,
            batch_size: config.processing.batch_size,
            max_retries: config.processing.max_retries,
            quality_threshold: config.processing.quality_threshold,
        },
        embedding: EmbeddingSummary {
            endpoint: config.embedding.endpoint.clone(),
            model: config.embedding.model.clone(),
            dims: config.embedding.dims,
            api_key: masked(&config.embedding.api_key),
        },
        store: StoreSummary {
            url: config.store.url.clone(),
            collection: config.store.collection.clone(),
            vector_size: config.store.vector_size,
            distance: config.store.distance.clone(),
            api_key: masked(&config.store.api_key),
        },
        content_types,
    };

    match format {
        OutputFormat::Text => {
            println!("{}: {}", colors::label("Config file"), response.config_file);
            output::print_header("Ingest:");
            println!(
                "  transcripts: {}",
                colors::file_path(&response.ingest.transcripts_dir)
            );
            println!(
                "  ocr texts:   {}",
                colors::file_path(&response.ingest.ocr_texts_dir)
            );
            if let Some(manuals) = &response.ingest.manuals_dir {
                println!("  manuals:     {}", colors::file_path(manuals));
            }
            println!("  include: {:?}", response.ingest.include_patterns);
            println!("  exclude: {:?}", response.ingest.exclude_patterns);
            println!("  max file size: {} MB", response.ingest.max_file_size_mb);

            output::print_header("Processing:");
            println!("  default preset:  {}", response.processing.default_preset);
            println!("  smart selection: {}", response.processing.smart_selection);
            println!("  max workers:     {}", response.processing.max_workers);
            println!("  batch size:      {}", response.processing.batch_size);
            println!("  max retries:     {}", response.processing.max_retries);
            if let Some(threshold) = response.processing.quality_threshold {
                println!("  quality threshold: {threshold}");
            }

            output::print_header("Embedding:");
            println!("  endpoint: {}", response.embedding.endpoint);
            println!("  model:    {}", response.embedding.model);
            println!("  dims:     {}", response.embedding.dims);
            println!("  api key:  {}", response.embedding.api_key);

            output::print_header("Store:");
            println!("  url:         {}", response.store.url);
            println!("  collection:  {}", response.store.collection);
            println!("  vector size: {}", response.store.vector_size);
            println!("  distance:    {}", response.store.distance);
            println!("  api key:     {}", response.store.api_key);

            output::print_header("Content types:");
            for binding in &response.content_types {
                println!(
                    "  {:<12} {:<20} {}",
                    binding.content_type,
                    colors::file_id(&binding.preset),
                    colors::dim(&binding.config_id)
                );
            }
        }
        OutputFormat::Json => output::print_json(&response)?,
    }
    Ok(0)
}

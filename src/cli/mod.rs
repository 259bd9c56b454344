//! CLI adapter for Brewsync
//!
//! Provides the command-line interface for sync, cleanup, and analysis
//! passes. This module depends on `core/` only; all domain logic lives
//! there.

pub mod commands;
pub mod output;

use crate::core::config::Config;
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Brewsync - vector index sync for brewing content
///
/// Keeps a Qdrant collection synchronized with directories of speech
/// transcripts, OCR text, and manuals: validates quality, chunks,
/// embeds, and removes superseded or orphaned records.
#[derive(Parser, Debug)]
#[command(name = "brewsync")]
#[command(version)]
#[command(about = "Quality-controlled vector index sync for brewing content", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Force one named preset for every content type
    #[arg(long, global = true, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the maximum chunk size in characters
    #[arg(long, global = true, value_name = "CHARS")]
    pub max_chunk_size: Option<usize>,

    /// Override the minimum chunk size in characters
    #[arg(long, global = true, value_name = "CHARS")]
    pub min_chunk_size: Option<usize>,

    /// Override the overlap between adjacent chunks in characters
    #[arg(long, global = true, value_name = "CHARS")]
    pub overlap_size: Option<usize>,

    /// Override the minimum quality score an accepted document must reach
    #[arg(long, global = true, value_name = "SCORE")]
    pub quality_threshold: Option<f64>,

    /// Override the pipeline worker pool size
    #[arg(long, global = true, value_name = "N")]
    pub max_workers: Option<usize>,

    /// Override the embedding batch size
    #[arg(long, global = true, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Run against an empty in-memory store; nothing durable is written
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Text,
    /// JSON output for scripting
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full sync pass over the watched roots
    Sync(commands::SyncArgs),

    /// Remove index records for files that no longer exist on disk
    Cleanup(commands::CleanupArgs),

    /// Analyze the watched roots without embedding or writing anything
    Validate(commands::ValidateArgs),

    /// Inspect presets and the effective configuration
    Config(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  brewsync completions bash > ~/.local/share/bash-completion/completions/brewsync
    ///   zsh:   brewsync completions zsh > ~/.zfunc/_brewsync
    ///   fish:  brewsync completions fish > ~/.config/fish/completions/brewsync.fish
    Completions(commands::CompletionsArgs),
}

impl Cli {
    /// Load configuration with CLI flags winning over environment and file
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::from_file(path)?;
                config.merge_env();
                config
            }
            None => Config::load()?,
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(preset) = &self.preset {
            config.processing.default_preset = preset.clone();
            // A forced preset applies to every file regardless of type
            config.processing.smart_selection = false;
        }
        if let Some(v) = self.quality_threshold {
            config.processing.quality_threshold = Some(v);
        }
        if let Some(v) = self.max_workers {
            config.processing.max_workers = v;
        }
        if let Some(v) = self.batch_size {
            config.processing.batch_size = v;
        }

        let overrides = &mut config.processing.overrides;
        if let Some(v) = self.max_chunk_size {
            overrides.max_chunk_size = Some(v);
        }
        if let Some(v) = self.min_chunk_size {
            overrides.min_chunk_size = Some(v);
        }
        if let Some(v) = self.overlap_size {
            overrides.overlap_size = Some(v);
        }
    }
}

/// Run the CLI with the provided arguments, returning the process exit code
///
/// Exit codes: 0 on success, 2 when the pass completed but some files
/// failed. Errors returned here map to exit code 1 in the binary.
pub async fn run(cli: Cli) -> std::result::Result<i32, Box<dyn std::error::Error>> {
    use crate::core::services::Services;
    use crate::core::xdg::{migrate_legacy_paths, XdgDirs};

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        commands::completions::execute(args)?;
        return Ok(0);
    }

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    // Run migration from legacy paths (if needed)
    if let Err(e) = migrate_legacy_paths(&xdg) {
        output::print_warning(&format!("Migration issue: {e}"));
    }

    // Effective configuration, with CLI overrides applied
    let config = cli.load_config()?;
    config.log_config();

    match cli.command {
        Commands::Sync(args) => {
            let services = if cli.dry_run {
                Services::dry_run(config)?
            } else {
                Services::new(config)?
            };
            commands::sync::execute(args, &services, cli.format, &xdg).await
        }
        Commands::Cleanup(args) => {
            let services = if cli.dry_run {
                Services::analysis_only(config)
            } else {
                Services::cleanup_only(config)?
            };
            commands::cleanup::execute(args, &services, cli.format).await
        }
        Commands::Validate(args) => {
            let services = Services::analysis_only(config);
            commands::validate::execute(args, &services, cli.format).await
        }
        Commands::Config(args) => commands::config::execute(args, &config, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}

//! Core domain logic (adapter-agnostic)
//!
//! This module contains all business logic that is independent of the
//! CLI adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **lexicon**: Brewing domain keyword catalog
//! - **presets**: Preset catalog and profile resolution
//! - **pipeline**: Walking, preprocessing, validation, chunking, enrichment
//! - **embed**: Embedding gateway trait and HTTP client
//! - **store**: Vector store gateway trait, Qdrant and in-memory backends
//! - **sync**: The sync engine driving full passes
//! - **services**: Unified service container

pub mod config;
pub mod embed;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod presets;
pub mod services;
pub mod store;
pub mod sync;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{BrewsyncError, Result};
pub use services::Services;

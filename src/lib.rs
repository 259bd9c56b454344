//! Brewsync - Quality-Controlled Vector Index Sync
//!
//! Keeps a Qdrant collection continuously synchronized with directories
//! of heterogeneous brewing text: speech transcripts, OCR output from
//! slides, and manuals. Every file is cleaned, quality-scored against a
//! brewing domain lexicon, chunked, embedded, and written under a
//! deterministic identity so reruns are idempotent and superseded or
//! orphaned records are removed.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic (adapter-agnostic)
//!   - config, error, types, xdg
//!   - lexicon, presets (profile resolution)
//!   - pipeline (walking, preprocessing, validation, chunking, enrichment)
//!   - embed (embedding gateway), store (vector store gateways)
//!   - sync (the engine), services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - sync, cleanup, validate, config, completions
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - Two-tier quality validation with a domain keyword lexicon
//! - Content fingerprints and deterministic point ids (idempotent reruns)
//! - Per-file failure isolation; a pass always terminates with a report
//! - Qdrant REST gateway plus an in-memory store for tests and dry runs

// Core domain logic (adapter-agnostic)
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{BrewsyncError, Result};
pub use core::services::Services;
pub use core::types::*;

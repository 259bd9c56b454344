//! File system walker with pattern-based filtering.
//!
//! Traverses the watched roots and builds the source-file inventory.
//! Handles errors gracefully (permission denied, etc.) without
//! crashing.

use chrono::{DateTime, Utc};
use glob::Pattern;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{BrewsyncError, Result};
use crate::core::presets::InputConfig;
use crate::core::types::{ContentType, SourceFile};

/// File system walker with pattern-based filtering
pub struct FileWalker {
    /// Patterns to include (e.g., "*.txt")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/archive/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,
}

impl FileWalker {
    /// Build a walker from the input stage of a profile
    pub fn new(input: &InputConfig) -> Result<Self> {
        let include = input
            .include_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    BrewsyncError::ConfigError(format!("Invalid include pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let exclude = input
            .exclude_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    BrewsyncError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            include_patterns: include,
            exclude_patterns: exclude,
            max_file_size_bytes: (input.max_file_size_mb as u64) * 1024 * 1024,
        })
    }

    /// Inventory one watched root.
    ///
    /// A missing root is logged and yields an empty inventory so that
    /// partially provisioned corpora still sync. File ids are
    /// `<root-name>/<relative-path>` with forward slashes, stable across
    /// hosts and working directories. Results are sorted by file id.
    pub fn inventory(&self, root: &Path, content_type: ContentType) -> Result<Vec<SourceFile>> {
        if !root.is_dir() {
            tracing::warn!("Watched root {:?} does not exist, skipping", root);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_process_entry(e, root))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();

                    let metadata = match entry.metadata() {
                        Ok(m) => m,
                        Err(e) => {
                            tracing::warn!("Cannot stat {:?}: {}", path, e);
                            continue;
                        }
                    };

                    if metadata.len() > self.max_file_size_bytes {
                        tracing::debug!(
                            "Skipping large file: {:?} ({} bytes)",
                            path,
                            metadata.len()
                        );
                        continue;
                    }

                    if !self.matches_patterns(path) {
                        continue;
                    }

                    let Some(file_id) = file_id_for(root, path) else {
                        tracing::warn!("Non-UTF-8 path {:?}, skipping", path);
                        continue;
                    };

                    let modified_at = metadata
                        .modified()
                        .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
                        .unwrap_or_default();

                    files.push(SourceFile {
                        file_id,
                        path: path.to_path_buf(),
                        content_type,
                        size_bytes: metadata.len(),
                        modified_at,
                    });
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    // Continue walking despite errors
                }
            }
        }

        files.sort_by(|a, b| a.file_id.cmp(&b.file_id));
        Ok(files)
    }

    /// Determine if a directory entry should be processed
    ///
    /// Filters out hidden directories and excluded patterns.
    /// Never filters the root directory itself.
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();

        // Never filter the root directory
        if path == root {
            return true;
        }

        // Skip hidden directories (starting with '.')
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') && entry.file_type().is_dir() {
                return false;
            }
        }

        // Check exclude patterns for directories
        // (skip entire directory trees early)
        if entry.file_type().is_dir() {
            for pattern in &self.exclude_patterns {
                if pattern.matches_path(path) {
                    tracing::debug!("Skipping excluded directory: {:?}", path);
                    return false;
                }
            }
        }

        true
    }

    /// Check if a file path matches the include/exclude patterns
    fn matches_patterns(&self, path: &Path) -> bool {
        let path_str = match path.to_str() {
            Some(s) => s,
            None => return false,
        };

        // If no include patterns, include all
        let matches_include = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| {
                // Match against both full path and filename
                p.matches(path_str)
                    || path
                        .file_name()
                        .and_then(|f| f.to_str())
                        .map(|f| p.matches(f))
                        .unwrap_or(false)
            });

        if !matches_include {
            return false;
        }

        // Must not match any exclude pattern
        !self
            .exclude_patterns
            .iter()
            .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}

/// Stable file identifier: watched-root name joined with the root-relative
/// path, normalized to forward slashes.
fn file_id_for(root: &Path, path: &Path) -> Option<String> {
    let root_name = root.file_name()?.to_str()?;
    let relative = path.strip_prefix(root).ok()?;

    let mut id = String::from(root_name);
    for component in relative.components() {
        id.push('/');
        id.push_str(component.as_os_str().to_str()?);
    }
    Some(id)
}

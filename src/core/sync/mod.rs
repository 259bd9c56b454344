//! Sync engine.
//!
//! Drives one pass over the watched roots: build the inventory, run the
//! text pipeline across a bounded worker pool, decide per file whether
//! the store is already current, embed and upsert what changed, delete
//! superseded records strictly after their replacements are confirmed,
//! and remove records for files that vanished from disk.
//!
//! Failures stay scoped to their file. A pass always terminates with a
//! report; files that failed remain eligible on the next pass.

use crate::core::config::Config;
use crate::core::embed::Embedder;
use crate::core::error::{BrewsyncError, Result};
use crate::core::pipeline::{FileOutput, FilePipeline, FileWalker};
use crate::core::presets::{ConfigResolver, InputConfig};
use crate::core::store::{IndexPoint, VectorStore};
use crate::core::types::{
    AnalysisReport, CleanupReport, FileAnalysis, FileOutcome, FileStatus, IndexRecord, SourceFile,
    SyncReport, TextChunk,
};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const MAX_BACKOFF_SECS: u64 = 32;

/// Retry a gateway call with bounded exponential backoff.
///
/// Waits `1 << attempt` seconds between attempts, capped at
/// [`MAX_BACKOFF_SECS`]. Only errors marked retryable are retried;
/// anything else surfaces immediately.
pub(crate) async fn with_backoff<T, F, Fut>(max_retries: u32, action: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = Duration::from_secs((1u64 << attempt).min(MAX_BACKOFF_SECS));
                warn!(
                    action,
                    attempt = attempt + 1,
                    max_retries,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Orchestrates sync, cleanup, and validate passes
pub struct SyncEngine {
    config: Arc<Config>,
    resolver: ConfigResolver,
    walker: FileWalker,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    stop: Arc<AtomicBool>,
}

impl SyncEngine {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let resolver = ConfigResolver::from_config(&config)?;
        let walker = FileWalker::new(&InputConfig::from(&config.ingest))?;
        Ok(Self {
            config,
            resolver,
            walker,
            store,
            embedder,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Cooperative stop flag. Setting it halts the pass after the
    /// in-flight file completes; nothing already written is rolled back.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Walk every watched root into one inventory, sorted by file id
    fn build_inventory(&self) -> Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        for (root, content_type) in self.config.watched_roots() {
            files.extend(self.walker.inventory(&root, content_type)?);
        }
        files.sort_by(|a, b| a.file_id.cmp(&b.file_id));
        Ok(files)
    }

    /// Run the full sync pass
    pub async fn sync(&self) -> Result<SyncReport> {
        let start = Instant::now();
        let max_retries = self.config.processing.max_retries;

        if self.embedder.dims() != self.config.store.vector_size {
            return Err(BrewsyncError::ConfigError(format!(
                "Embedder produces {}-dimensional vectors but collection '{}' expects {}",
                self.embedder.dims(),
                self.config.store.collection,
                self.config.store.vector_size
            )));
        }

        with_backoff(max_retries, "ensure_collection", || {
            self.store.ensure_collection()
        })
        .await?;

        let files = self.build_inventory()?;
        info!("Found {} files under the watched roots", files.len());

        let records = with_backoff(max_retries, "list_records", || self.store.list_records()).await?;
        let mut records_by_file: HashMap<String, Vec<IndexRecord>> = HashMap::new();
        for record in records {
            records_by_file
                .entry(record.file_id.clone())
                .or_default()
                .push(record);
        }

        let inventory_ids: HashSet<String> = files.iter().map(|f| f.file_id.clone()).collect();
        let mut report = SyncReport {
            files_scanned: files.len(),
            ..Default::default()
        };

        let processed_at = Utc::now().to_rfc3339();
        let prepared = self.prepare_files(files, &processed_at).await;

        for (file, output) in prepared {
            if self.stopped() {
                warn!("Stop requested; halting before remaining files");
                break;
            }
            let existing = records_by_file
                .get(&file.file_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let outcome = match output {
                Ok(FileOutput::Processed {
                    chunks,
                    chunks_rejected,
                    text_length,
                }) => {
                    report.chunks_rejected += chunks_rejected;
                    let outcome = self.flush_file(&file, chunks, existing).await;
                    if outcome.status == FileStatus::Processed {
                        report.total_text_length += text_length;
                    }
                    outcome
                }
                Ok(FileOutput::Rejected { score, issues }) => {
                    debug!(file_id = %file.file_id, score, "Document rejected by validation");
                    FileOutcome {
                        file_id: file.file_id.clone(),
                        status: FileStatus::Rejected,
                        chunks_created: 0,
                        chunks_deleted: 0,
                        issues: issues.iter().map(|i| i.as_str().to_string()).collect(),
                        detail: None,
                    }
                }
                Err(e) => {
                    warn!(
                        file_id = %file.file_id,
                        error = %e,
                        "File failed; existing records left untouched"
                    );
                    FileOutcome {
                        file_id: file.file_id.clone(),
                        status: FileStatus::Failed,
                        chunks_created: 0,
                        chunks_deleted: 0,
                        issues: vec![],
                        detail: Some(e.message()),
                    }
                }
            };
            report.record(outcome);
        }

        if !self.stopped() {
            let mut orphaned: Vec<(&String, &Vec<IndexRecord>)> = records_by_file
                .iter()
                .filter(|(file_id, _)| !inventory_ids.contains(*file_id))
                .collect();
            orphaned.sort_by_key(|(file_id, _)| file_id.as_str());

            for (file_id, file_records) in orphaned {
                match with_backoff(max_retries, "delete_by_file", || {
                    self.store.delete_by_file(file_id)
                })
                .await
                {
                    Ok(()) => {
                        info!(
                            file_id = %file_id,
                            chunks = file_records.len(),
                            "Removed records for vanished file"
                        );
                        report.chunks_deleted += file_records.len();
                    }
                    Err(e) => {
                        warn!(file_id = %file_id, error = %e, "Failed to remove orphaned records");
                    }
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            files_scanned = report.files_scanned,
            files_processed = report.files_processed,
            files_skipped = report.files_skipped,
            files_rejected = report.files_rejected,
            files_failed = report.files_failed,
            chunks_created = report.chunks_created,
            chunks_rejected = report.chunks_rejected,
            chunks_deleted = report.chunks_deleted,
            duration_ms = report.duration_ms,
            "Sync pass complete"
        );
        Ok(report)
    }

    /// Phase one: pipeline work across a bounded worker pool.
    ///
    /// Results come back in completion order and are re-sorted by file
    /// id so reports stay deterministic. Files not yet started when the
    /// stop flag goes up are dropped from the results.
    async fn prepare_files(
        &self,
        files: Vec<SourceFile>,
        processed_at: &str,
    ) -> Vec<(SourceFile, Result<FileOutput>)> {
        let workers = self.config.processing.max_workers.max(1);

        let mut prepared: Vec<(SourceFile, Result<FileOutput>)> =
            stream::iter(files.into_iter().map(|file| {
                let stop = Arc::clone(&self.stop);
                let profile = self.resolver.resolve(file.content_type);
                let processed_at = processed_at.to_string();
                async move {
                    if stop.load(Ordering::Relaxed) {
                        return None;
                    }
                    let profile = match profile {
                        Ok(profile) => profile,
                        Err(e) => return Some((file, Err(e))),
                    };
                    let task_file = file.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        let pipeline = FilePipeline::for_profile(&profile);
                        pipeline.process_path(&task_file, &processed_at)
                    })
                    .await;
                    let output = match joined {
                        Ok(output) => output,
                        Err(e) => Err(BrewsyncError::Extraction {
                            path: file.path.display().to_string(),
                            message: format!("pipeline task failed: {e}"),
                        }),
                    };
                    Some((file, output))
                }
            }))
            .buffer_unordered(workers)
            .filter_map(|item| async move { item })
            .collect()
            .await;

        prepared.sort_by(|a, b| a.0.file_id.cmp(&b.0.file_id));
        prepared
    }

    /// Phase two for one file: skip decision, embedding, upserts, and
    /// supersession deletes. Deletes are issued only after every upsert
    /// for the file has been confirmed.
    async fn flush_file(
        &self,
        file: &SourceFile,
        chunks: Vec<TextChunk>,
        existing: &[IndexRecord],
    ) -> FileOutcome {
        let config_id = match chunks.first() {
            Some(chunk) => chunk.config_id.clone(),
            None => match self.resolver.resolve(file.content_type) {
                Ok(profile) => profile.config_id(),
                Err(e) => {
                    return FileOutcome {
                        file_id: file.file_id.clone(),
                        status: FileStatus::Failed,
                        chunks_created: 0,
                        chunks_deleted: 0,
                        issues: vec![],
                        detail: Some(e.message()),
                    }
                }
            },
        };

        let current: Vec<&IndexRecord> = existing
            .iter()
            .filter(|r| r.config_id == config_id)
            .collect();
        let foreign_records = existing.len() - current.len();

        let mut new_hashes: Vec<&str> = chunks.iter().map(|c| c.content_hash.as_str()).collect();
        new_hashes.sort_unstable();
        let mut old_hashes: Vec<&str> = current.iter().map(|r| r.content_hash.as_str()).collect();
        old_hashes.sort_unstable();

        if !existing.is_empty() && foreign_records == 0 && new_hashes == old_hashes {
            debug!(file_id = %file.file_id, "Index already current; skipping");
            return FileOutcome {
                file_id: file.file_id.clone(),
                status: FileStatus::Skipped,
                chunks_created: 0,
                chunks_deleted: 0,
                issues: vec![],
                detail: None,
            };
        }

        let max_retries = self.config.processing.max_retries;
        let batch_size = self.config.processing.batch_size.max(1);
        let mut points_written = 0usize;

        for batch in chunks.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = match with_backoff(max_retries, "embed_batch", || {
                self.embedder.embed_batch(&texts)
            })
            .await
            {
                Ok(vectors) => vectors,
                Err(e) => {
                    warn!(file_id = %file.file_id, error = %e, "Embedding failed");
                    return self.failed_outcome(file, points_written, e);
                }
            };

            let points: Vec<IndexPoint> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| IndexPoint::from_chunk(chunk, vector))
                .collect();
            if let Err(e) =
                with_backoff(max_retries, "upsert", || self.store.upsert(&points)).await
            {
                warn!(file_id = %file.file_id, error = %e, "Upsert failed");
                return self.failed_outcome(file, points_written, e);
            }
            points_written += points.len();
        }

        let new_ids: HashSet<&str> = chunks.iter().map(|c| c.point_id.as_str()).collect();
        let stale: Vec<String> = existing
            .iter()
            .filter(|r| !new_ids.contains(r.point_id.as_str()))
            .map(|r| r.point_id.clone())
            .collect();
        if !stale.is_empty() {
            if let Err(e) =
                with_backoff(max_retries, "delete_points", || self.store.delete_points(&stale))
                    .await
            {
                warn!(file_id = %file.file_id, error = %e, "Failed to delete superseded records");
                return self.failed_outcome(file, points_written, e);
            }
        }

        info!(
            file_id = %file.file_id,
            chunks = chunks.len(),
            superseded = stale.len(),
            "File synced"
        );
        FileOutcome {
            file_id: file.file_id.clone(),
            status: FileStatus::Processed,
            chunks_created: chunks.len(),
            chunks_deleted: stale.len(),
            issues: vec![],
            detail: None,
        }
    }

    /// Failed outcome that still accounts for points already written.
    /// Those points are valid current chunks; a later successful pass
    /// re-upserts them idempotently and completes the supersession.
    fn failed_outcome(
        &self,
        file: &SourceFile,
        points_written: usize,
        error: BrewsyncError,
    ) -> FileOutcome {
        FileOutcome {
            file_id: file.file_id.clone(),
            status: FileStatus::Failed,
            chunks_created: points_written,
            chunks_deleted: 0,
            issues: vec![],
            detail: Some(error.message()),
        }
    }

    /// Remove records for files no longer present on disk
    pub async fn cleanup(&self) -> Result<CleanupReport> {
        let max_retries = self.config.processing.max_retries;

        with_backoff(max_retries, "ensure_collection", || {
            self.store.ensure_collection()
        })
        .await?;
        let records = with_backoff(max_retries, "list_records", || self.store.list_records()).await?;

        let mut records_by_file: BTreeMap<String, Vec<IndexRecord>> = BTreeMap::new();
        for record in records {
            records_by_file
                .entry(record.file_id.clone())
                .or_default()
                .push(record);
        }

        let files = self.build_inventory()?;
        let inventory_ids: HashSet<&str> = files.iter().map(|f| f.file_id.as_str()).collect();

        let mut report = CleanupReport {
            files_checked: records_by_file.len(),
            ..Default::default()
        };

        for (file_id, file_records) in &records_by_file {
            if inventory_ids.contains(file_id.as_str()) {
                continue;
            }
            report.files_orphaned += 1;
            match with_backoff(max_retries, "delete_by_file", || {
                self.store.delete_by_file(file_id)
            })
            .await
            {
                Ok(()) => {
                    info!(
                        file_id = %file_id,
                        chunks = file_records.len(),
                        "Removed records for vanished file"
                    );
                    report.chunks_deleted += file_records.len();
                    report.files_cleaned.push(file_id.clone());
                }
                Err(e) => {
                    warn!(file_id = %file_id, error = %e, "Failed to remove orphaned records");
                }
            }
        }

        info!(
            files_checked = report.files_checked,
            files_orphaned = report.files_orphaned,
            chunks_deleted = report.chunks_deleted,
            "Cleanup complete"
        );
        Ok(report)
    }

    /// Analyze the inventory without embedding or writing anything
    pub async fn validate(&self) -> Result<AnalysisReport> {
        let files = self.build_inventory()?;
        info!("Analyzing {} files", files.len());

        let mut report = AnalysisReport::default();
        for file in files {
            if self.stopped() {
                warn!("Stop requested; halting analysis");
                break;
            }
            let profile = self.resolver.resolve(file.content_type)?;
            let task_file = file.clone();
            let joined = tokio::task::spawn_blocking(move || {
                let pipeline = FilePipeline::for_profile(&profile);
                pipeline.analyze_path(&task_file)
            })
            .await;
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(BrewsyncError::Extraction {
                    path: file.path.display().to_string(),
                    message: format!("analysis task failed: {e}"),
                }),
            };

            report.files_analyzed += 1;
            match outcome {
                Ok(outcome) => {
                    if outcome.is_valid {
                        report.files_valid += 1;
                        report.total_text_length += outcome.analysis.char_count;
                        report.total_words += outcome.analysis.word_count;
                    }
                    for issue in &outcome.issues {
                        *report
                            .issue_counts
                            .entry(issue.as_str().to_string())
                            .or_default() += 1;
                    }
                    for (category, hits) in &outcome.analysis.keyword_hits {
                        *report
                            .keyword_counts
                            .entry(category.as_str().to_string())
                            .or_default() += *hits;
                    }
                    report.analyses.push(FileAnalysis {
                        file_id: file.file_id.clone(),
                        is_valid: outcome.is_valid,
                        quality_score: outcome.score,
                        word_count: outcome.analysis.word_count,
                        keyword_hits: outcome.analysis.total_keyword_hits(),
                        issues: outcome.issues.iter().map(|i| i.as_str().to_string()).collect(),
                    });
                }
                Err(e) => {
                    warn!(file_id = %file.file_id, error = %e, "Analysis failed");
                    report.analyses.push(FileAnalysis {
                        file_id: file.file_id.clone(),
                        is_valid: false,
                        quality_score: 0.0,
                        word_count: 0,
                        keyword_hits: 0,
                        issues: vec![e.message()],
                    });
                }
            }
        }

        info!(
            files_analyzed = report.files_analyzed,
            files_valid = report.files_valid,
            "Analysis complete"
        );
        Ok(report)
    }
}

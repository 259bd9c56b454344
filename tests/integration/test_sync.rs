// Full sync passes: first index, incremental skip, and supersession

use crate::common::fixtures::{self, ContentRoots};
use crate::common::helpers::{test_config, test_engine, CountingEmbedder};
use brewsync::core::store::{MemoryStore, VectorStore};
use brewsync::core::types::FileStatus;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_first_sync_covers_every_root() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("ocr/slides.txt", fixtures::TRANSCRIPT_ALT);
    roots.write("manuals/guide.txt", fixtures::TRANSCRIPT);

    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(4));
    let engine = test_engine(test_config(roots.path()), store.clone(), embedder.clone());

    let report = engine.sync().await.unwrap();

    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.files_processed, 3);
    assert_eq!(report.files_failed, 0);
    assert_eq!(report.chunks_created, 3);
    assert_eq!(store.len(), 3);

    // Outcomes come back in inventory order
    let ids: Vec<&str> = report.outcomes.iter().map(|o| o.file_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["manuals/guide.txt", "ocr/slides.txt", "transcripts/ep01.txt"]
    );

    // Each root resolves its own preset through smart selection
    let configs: HashSet<String> = store
        .list_records()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.config_id)
        .collect();
    let expected: HashSet<String> = ["general_brewing", "presentation_text", "video_transcript"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(configs, expected);
}

#[tokio::test]
async fn test_identical_text_in_two_files_gets_its_own_points() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("transcripts/ep02.txt", fixtures::TRANSCRIPT);

    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(4));
    let engine = test_engine(test_config(roots.path()), store.clone(), embedder);

    let report = engine.sync().await.unwrap();

    assert_eq!(report.files_processed, 2);
    assert_eq!(store.len(), 2, "point ids are scoped by file");
}

#[tokio::test]
async fn test_rerun_skips_without_embedding_or_writes() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("ocr/slides.txt", fixtures::TRANSCRIPT_ALT);

    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(4));
    let engine = test_engine(test_config(roots.path()), store.clone(), embedder.clone());

    engine.sync().await.unwrap();
    let embed_calls = embedder.calls();
    let upsert_calls = store.upsert_calls();

    let second = engine.sync().await.unwrap();

    assert_eq!(second.files_skipped, 2);
    assert_eq!(second.files_processed, 0);
    assert_eq!(second.chunks_created, 0);
    assert_eq!(embedder.calls(), embed_calls, "skip must not embed");
    assert_eq!(store.upsert_calls(), upsert_calls, "skip must not write");
}

#[tokio::test]
async fn test_edited_file_supersedes_its_old_records() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("transcripts/ep02.txt", fixtures::TRANSCRIPT_ALT);

    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(4));
    let engine = test_engine(test_config(roots.path()), store.clone(), embedder);

    engine.sync().await.unwrap();
    let before: HashSet<String> = store
        .list_records()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.file_id == "transcripts/ep01.txt")
        .map(|r| r.point_id)
        .collect();

    roots.write("transcripts/ep01.txt", fixtures::SIX_SENTENCES);
    let second = engine.sync().await.unwrap();

    assert_eq!(second.files_processed, 1);
    assert_eq!(second.files_skipped, 1);
    assert_eq!(second.chunks_deleted, 1);

    let after: HashSet<String> = store
        .list_records()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.file_id == "transcripts/ep01.txt")
        .map(|r| r.point_id)
        .collect();
    assert!(before.is_disjoint(&after), "old points must be gone");
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_geometry_change_supersedes_the_whole_file() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::SIX_SENTENCES);
    let store = Arc::new(MemoryStore::new());

    // First pass under a small geometry: three chunks
    let mut small = test_config(roots.path());
    small.processing.overrides.max_chunk_size = Some(200);
    small.processing.overrides.min_chunk_size = Some(50);
    small.processing.overrides.overlap_size = Some(0);
    let engine = test_engine(small, store.clone(), Arc::new(CountingEmbedder::new(4)));
    let first = engine.sync().await.unwrap();
    assert_eq!(first.chunks_created, 3);

    // Second pass under the pristine preset: the same unchanged file is
    // reprocessed because none of its records match the new config id
    let engine = test_engine(
        test_config(roots.path()),
        store.clone(),
        Arc::new(CountingEmbedder::new(4)),
    );
    let second = engine.sync().await.unwrap();

    assert_eq!(second.files_processed, 1);
    assert_eq!(second.chunks_created, 1);
    assert_eq!(second.chunks_deleted, 3);
    assert_eq!(store.len(), 1);

    let records = store.list_records().await.unwrap();
    assert_eq!(records[0].config_id, "video_transcript");
}

#[tokio::test]
async fn test_vanished_file_is_cleaned_during_sync() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("transcripts/ep02.txt", fixtures::TRANSCRIPT_ALT);

    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(4));
    let engine = test_engine(test_config(roots.path()), store.clone(), embedder);

    engine.sync().await.unwrap();
    assert_eq!(store.len(), 2);

    roots.remove("transcripts/ep02.txt");
    let second = engine.sync().await.unwrap();

    assert_eq!(second.files_scanned, 1);
    assert_eq!(second.chunks_deleted, 1);
    assert_eq!(store.len(), 1);

    let records = store.list_records().await.unwrap();
    assert_eq!(records[0].file_id, "transcripts/ep01.txt");
}

#[tokio::test]
async fn test_rejected_file_writes_nothing() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("transcripts/noise.txt", fixtures::NOISE);

    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(CountingEmbedder::new(4));
    let engine = test_engine(test_config(roots.path()), store.clone(), embedder);

    let report = engine.sync().await.unwrap();

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.files_rejected, 1);
    assert!(!report.is_partial(), "rejection is policy, not failure");
    assert_eq!(store.len(), 1);

    let rejected = report
        .outcomes
        .iter()
        .find(|o| o.file_id == "transcripts/noise.txt")
        .unwrap();
    assert_eq!(rejected.status, FileStatus::Rejected);
    assert!(rejected.issues.iter().any(|i| i == "too_short"));
}

// Tests for the sync, cleanup, and validate command handlers
//
// Each handler runs against in-memory services; the sync test also
// checks the persisted report under a redirected state directory.

use crate::common::fixtures::{self, ContentRoots};
use crate::common::helpers::{test_config, test_services, CountingEmbedder};
use async_trait::async_trait;
use brewsync::cli::commands::{cleanup, sync, validate};
use brewsync::cli::commands::{CleanupArgs, SyncArgs, ValidateArgs};
use brewsync::cli::OutputFormat;
use brewsync::core::embed::Embedder;
use brewsync::core::error::{BrewsyncError, Result};
use brewsync::core::services::Services;
use brewsync::core::store::MemoryStore;
use brewsync::core::types::SyncReport;
use brewsync::core::xdg::XdgDirs;
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

/// Embedder that refuses every batch, for exercising partial failure
struct RefusingEmbedder;

#[async_trait]
impl Embedder for RefusingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(BrewsyncError::EmbeddingService {
            message: "endpoint rejected the batch".to_string(),
            retryable: false,
        })
    }

    fn model_name(&self) -> &str {
        "refusing-stub"
    }

    fn dims(&self) -> usize {
        4
    }
}

fn redirect_xdg_dirs() -> (TempDir, XdgDirs) {
    let temp = TempDir::new().unwrap();
    std::env::set_var("BREWSYNC_CONFIG_DIR", temp.path().join("config"));
    std::env::set_var("BREWSYNC_STATE_DIR", temp.path().join("state"));
    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist().unwrap();
    (temp, xdg)
}

fn clear_xdg_dirs() {
    std::env::remove_var("BREWSYNC_CONFIG_DIR");
    std::env::remove_var("BREWSYNC_STATE_DIR");
}

#[tokio::test]
#[serial]
async fn test_sync_command_succeeds_and_persists_report() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);

    let services = test_services(
        test_config(roots.path()),
        Arc::new(MemoryStore::new()),
        Arc::new(CountingEmbedder::new(4)),
    );
    let (_dirs, xdg) = redirect_xdg_dirs();

    let code = sync::execute(SyncArgs {}, &services, OutputFormat::Json, &xdg)
        .await
        .unwrap();
    assert_eq!(code, 0);

    let saved = std::fs::read(xdg.last_report_file()).unwrap();
    let report: SyncReport = serde_json::from_slice(&saved).unwrap();
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.chunks_created, 1);

    clear_xdg_dirs();
}

#[tokio::test]
#[serial]
async fn test_sync_command_partial_failure_exits_two() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);

    let services = Services {
        config: Arc::new(test_config(roots.path())),
        store: Arc::new(MemoryStore::new()),
        embedder: Arc::new(RefusingEmbedder),
    };
    let (_dirs, xdg) = redirect_xdg_dirs();

    let code = sync::execute(SyncArgs {}, &services, OutputFormat::Json, &xdg)
        .await
        .unwrap();
    assert_eq!(code, 2, "failed files surface as a partial pass");

    clear_xdg_dirs();
}

#[tokio::test]
async fn test_cleanup_command_removes_orphans() {
    let roots = ContentRoots::new();
    roots.write("transcripts/ep01.txt", fixtures::TRANSCRIPT);
    roots.write("transcripts/ep02.txt", fixtures::TRANSCRIPT_ALT);

    let store = Arc::new(MemoryStore::new());
    let services = test_services(
        test_config(roots.path()),
        store.clone(),
        Arc::new(CountingEmbedder::new(4)),
    );

    services.engine().unwrap().sync().await.unwrap();
    roots.remove("transcripts/ep02.txt");

    let code = cleanup::execute(CleanupArgs {}, &services, OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_validate_command_always_exits_zero() {
    let roots = ContentRoots::new();
    roots.write("transcripts/noise.txt", fixtures::NOISE);

    let store = Arc::new(MemoryStore::new());
    let services = test_services(
        test_config(roots.path()),
        store.clone(),
        Arc::new(CountingEmbedder::new(4)),
    );

    let code = validate::execute(
        ValidateArgs { verbose: true },
        &services,
        OutputFormat::Json,
    )
    .await
    .unwrap();

    assert_eq!(code, 0, "invalid files report findings, not failure");
    assert!(store.is_empty());
}

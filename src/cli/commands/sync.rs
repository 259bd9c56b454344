//! Sync command - run a full processing pass over the watched roots

use crate::cli::output::{self, colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{FileStatus, SyncReport};
use crate::core::xdg::XdgDirs;
use clap::Args;
use std::fs;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {}

/// Execute the sync command
pub async fn execute(
    _args: SyncArgs,
    services: &Services,
    format: OutputFormat,
    xdg: &XdgDirs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = services.engine()?;
    super::arm_stop_on_ctrl_c(&engine);

    let report = engine.sync().await?;

    if let Err(e) = persist_report(&report, xdg) {
        output::print_warning(&format!("Could not save sync report: {e}"));
    }

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => output::print_json(&report)?,
    }

    Ok(if report.is_partial() { 2 } else { 0 })
}

/// Save the report for later inspection under the XDG state dir
fn persist_report(report: &SyncReport, xdg: &XdgDirs) -> Result<(), Box<dyn std::error::Error>> {
    let path = xdg.last_report_file();
    fs::write(&path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}

fn print_text(report: &SyncReport) {
    println!(
        "{} {} files ({} chunks) in {}",
        colors::success("Synced"),
        colors::number(&report.files_scanned.to_string()),
        colors::number(&report.chunks_created.to_string()),
        colors::number(&format_duration(report.duration_ms as f64 / 1000.0))
    );
    println!(
        "  files:  {} processed  {} skipped  {} rejected  {} failed",
        colors::number(&report.files_processed.to_string()),
        colors::number(&report.files_skipped.to_string()),
        colors::number(&report.files_rejected.to_string()),
        colors::number(&report.files_failed.to_string())
    );
    println!(
        "  chunks: {} created  {} rejected  {} deleted",
        colors::number(&report.chunks_created.to_string()),
        colors::number(&report.chunks_rejected.to_string()),
        colors::number(&report.chunks_deleted.to_string())
    );

    for outcome in &report.outcomes {
        match outcome.status {
            FileStatus::Rejected => {
                println!(
                    "  {} {}: {}",
                    colors::warning("rejected"),
                    colors::file_id(&outcome.file_id),
                    colors::dim(&outcome.issues.join(", "))
                );
            }
            FileStatus::Failed => {
                println!(
                    "  {} {}: {}",
                    colors::error("failed"),
                    colors::file_id(&outcome.file_id),
                    outcome.detail.as_deref().unwrap_or("unknown error")
                );
            }
            FileStatus::Processed | FileStatus::Skipped => {}
        }
    }

    if report.is_partial() {
        println!(
            "{}",
            colors::warning("Some files failed; they remain eligible on the next pass.")
        );
    }
}

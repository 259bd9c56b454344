//! Cleanup command - remove records for files that vanished from disk

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::CleanupReport;
use clap::Args;

/// Arguments for the cleanup command
#[derive(Args, Debug)]
pub struct CleanupArgs {}

/// Execute the cleanup command
pub async fn execute(
    _args: CleanupArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = services.engine()?;
    super::arm_stop_on_ctrl_c(&engine);

    let report = engine.cleanup().await?;

    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => output::print_json(&report)?,
    }

    // Orphans that survived a failed delete count as partial failure
    Ok(if report.files_cleaned.len() < report.files_orphaned {
        2
    } else {
        0
    })
}

fn print_text(report: &CleanupReport) {
    if report.files_orphaned == 0 {
        println!(
            "{} {} files checked, nothing orphaned",
            colors::success("Clean:"),
            colors::number(&report.files_checked.to_string())
        );
        return;
    }

    println!(
        "{} {} chunks across {} orphaned files ({} checked)",
        colors::success("Removed"),
        colors::number(&report.chunks_deleted.to_string()),
        colors::number(&report.files_orphaned.to_string()),
        colors::number(&report.files_checked.to_string())
    );
    for file_id in &report.files_cleaned {
        println!("  {}", colors::file_id(file_id));
    }

    let failed = report.files_orphaned - report.files_cleaned.len();
    if failed > 0 {
        println!(
            "{}",
            colors::warning(&format!(
                "{failed} orphaned file(s) could not be removed; retry on the next pass."
            ))
        );
    }
}

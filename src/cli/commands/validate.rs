//! Validate command - analyze the watched roots without writing anything

use crate::cli::output::{self, colors, format_bytes};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::AnalysisReport;
use clap::Args;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// List every file with its score instead of the summary only
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Execute the validate command
pub async fn execute(
    args: ValidateArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = services.engine()?;
    super::arm_stop_on_ctrl_c(&engine);

    let report = engine.validate().await?;

    match format {
        OutputFormat::Text => print_text(&report, args.verbose),
        OutputFormat::Json => output::print_json(&report)?,
    }

    Ok(0)
}

fn print_text(report: &AnalysisReport, verbose: bool) {
    let percent = if report.files_analyzed > 0 {
        report.files_valid as f64 / report.files_analyzed as f64 * 100.0
    } else {
        0.0
    };
    println!(
        "{} {} files: {} valid ({percent:.0}%), {} of text, {} words",
        colors::success("Analyzed"),
        colors::number(&report.files_analyzed.to_string()),
        colors::number(&report.files_valid.to_string()),
        colors::number(&format_bytes(report.total_text_length as u64)),
        colors::number(&report.total_words.to_string())
    );

    if !report.issue_counts.is_empty() {
        output::print_header("Issues:");
        for (issue, count) in &report.issue_counts {
            println!("  {:<24} {}", issue, colors::number(&count.to_string()));
        }
    }

    if !report.keyword_counts.is_empty() {
        output::print_header("Keyword hits by category:");
        for (category, count) in &report.keyword_counts {
            println!("  {:<24} {}", category, colors::number(&count.to_string()));
        }
    }

    if verbose {
        output::print_header("Files:");
        for analysis in &report.analyses {
            let marker = if analysis.is_valid {
                colors::success("ok ")
            } else {
                colors::error("bad")
            };
            println!(
                "  {} {:<40} score {}  {} words  {} keyword hits",
                marker,
                colors::file_id(&analysis.file_id),
                colors::score(&format!("{:.2}", analysis.quality_score)),
                colors::number(&analysis.word_count.to_string()),
                colors::number(&analysis.keyword_hits.to_string())
            );
            if !analysis.issues.is_empty() {
                println!("      {}", colors::dim(&analysis.issues.join(", ")));
            }
        }
    } else {
        for analysis in report.analyses.iter().filter(|a| !a.is_valid) {
            println!(
                "  {} {}: {}",
                colors::warning("invalid"),
                colors::file_id(&analysis.file_id),
                colors::dim(&analysis.issues.join(", "))
            );
        }
    }
}

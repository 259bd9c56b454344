//! Tests for CLI output formatting helpers
//!
//! Tests the output formatting utilities:
//! - Byte formatting (KB, MB, GB)
//! - Duration formatting (ms, s, m)
//! - Color helpers (respects NO_COLOR)
//! - Format selection (text vs json)

use brewsync::cli::output::{format_bytes, format_duration, is_text};
use brewsync::cli::OutputFormat;

// =============================================================================
// format_bytes tests
// =============================================================================

/// Test byte formatting with various sizes
#[test]
fn test_format_bytes_various_sizes() {
    // Bytes (under 1 KB)
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(512), "512 B");
    assert_eq!(format_bytes(1023), "1023 B");

    // Kilobytes
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(102400), "100.0 KB");

    // Megabytes
    assert_eq!(format_bytes(1048576), "1.0 MB");
    assert_eq!(format_bytes(10485760), "10.0 MB");

    // Gigabytes
    assert_eq!(format_bytes(1073741824), "1.0 GB");
    assert_eq!(format_bytes(1610612736), "1.5 GB");
}

/// Test byte formatting boundary values
#[test]
fn test_format_bytes_edge_cases() {
    assert_eq!(format_bytes(1024 - 1), "1023 B"); // Just under 1 KB
    assert_eq!(format_bytes(1048576 - 1), "1024.0 KB"); // Just under 1 MB
    assert_eq!(format_bytes(1073741824 - 1), "1024.0 MB"); // Just under 1 GB
}

// =============================================================================
// format_duration tests
// =============================================================================

/// Test duration formatting with various times
#[test]
fn test_format_duration_various_times() {
    // Milliseconds (under 1 second)
    assert_eq!(format_duration(0.001), "1ms");
    assert_eq!(format_duration(0.5), "500ms");
    assert_eq!(format_duration(0.999), "999ms");

    // Seconds
    assert_eq!(format_duration(1.0), "1.00s");
    assert_eq!(format_duration(30.0), "30.00s");
    assert_eq!(format_duration(59.99), "59.99s");

    // Minutes
    assert_eq!(format_duration(60.0), "1m 0.0s");
    assert_eq!(format_duration(90.0), "1m 30.0s");
    assert_eq!(format_duration(125.5), "2m 5.5s");
}

/// Test duration formatting edge cases
#[test]
fn test_format_duration_edge_cases() {
    assert_eq!(format_duration(0.0), "0ms");
    assert!(format_duration(0.999).ends_with("ms"));
    assert!(format_duration(1.0).ends_with("s"));
    assert!(!format_duration(59.9).contains('m'));
    assert!(format_duration(60.0).contains('m'));
}

// =============================================================================
// Color helper tests
// Note: These test that colors don't break output, not visual appearance.
// The `colored` crate respects NO_COLOR env var automatically.
// =============================================================================

/// Test that color functions return valid strings
#[test]
fn test_colors_return_valid_strings() {
    use brewsync::cli::output::colors;

    // All color functions should return non-empty strings
    assert!(!colors::label("test").to_string().is_empty());
    assert!(!colors::file_id("transcripts/ep01.txt").to_string().is_empty());
    assert!(!colors::file_path("/path/to/file").to_string().is_empty());
    assert!(!colors::number("42").to_string().is_empty());
    assert!(!colors::success("done").to_string().is_empty());
    assert!(!colors::warning("caution").to_string().is_empty());
    assert!(!colors::error("failed").to_string().is_empty());
    assert!(!colors::dim("secondary").to_string().is_empty());
    assert!(!colors::score("0.85").to_string().is_empty());
}

/// Test that colors preserve the original text
#[test]
fn test_colors_preserve_text() {
    use brewsync::cli::output::colors;

    assert!(colors::label("important").to_string().contains("important"));
    assert!(colors::file_id("ocr/slides.txt")
        .to_string()
        .contains("ocr/slides.txt"));
    assert!(colors::score("0.85").to_string().contains("0.85"));
}

// =============================================================================
// Format selection tests
// =============================================================================

#[test]
fn test_is_text_distinguishes_formats() {
    assert!(is_text(OutputFormat::Text));
    assert!(!is_text(OutputFormat::Json));
}

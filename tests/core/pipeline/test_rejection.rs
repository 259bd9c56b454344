// Rejection policy through the full pipeline
//
// Rejection is policy, not failure: thin, unstructured, or off-domain
// input yields a scored rejection, never an error.

use crate::common::fixtures;
use brewsync::core::pipeline::{FileOutput, FilePipeline, ValidationIssue};
use brewsync::core::presets::{InputConfig, PresetName, ProcessingProfile};
use brewsync::core::types::{ContentType, SourceFile};
use std::path::PathBuf;

fn profile() -> ProcessingProfile {
    let input = InputConfig {
        include_patterns: vec!["*.txt".to_string()],
        exclude_patterns: vec![],
        max_file_size_mb: 10,
    };
    ProcessingProfile::from_preset(PresetName::VideoTranscript, input)
}

fn transcript_file() -> SourceFile {
    SourceFile {
        file_id: "transcripts/ep01.txt".to_string(),
        path: PathBuf::from("data/transcripts/ep01.txt"),
        content_type: ContentType::Transcript,
        size_bytes: 0,
        modified_at: String::new(),
    }
}

#[test]
fn test_noise_rejected_as_too_short() {
    let pipeline = FilePipeline::for_profile(&profile());

    let output = pipeline.process_text(&transcript_file(), fixtures::NOISE, "t");

    let FileOutput::Rejected { score, issues } = output else {
        panic!("expected rejected output");
    };
    assert!(issues.contains(&ValidationIssue::TooShort));
    assert!(score < 0.25);
}

#[test]
fn test_single_sentence_rejected_for_structure() {
    let mut profile = profile();
    // Low floor so the sentence gate is what rejects, not length
    profile.chunking.min_text_length = 40;
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::OFF_TOPIC, "t");

    let FileOutput::Rejected { issues, .. } = output else {
        panic!("expected rejected output");
    };
    assert!(issues.contains(&ValidationIssue::InsufficientSentences));
    assert!(issues.contains(&ValidationIssue::LowDomainRelevance));
}

#[test]
fn test_off_domain_prose_is_downscored_not_invalid() {
    let profile = ProcessingProfile::from_preset(PresetName::GeneralBrewing, profile().input);
    let pipeline = FilePipeline::for_profile(&profile);

    let block = "The committee reviewed quarterly paperwork during the long meeting. \
        Several unrelated topics appeared on the printed agenda for discussion. ";
    let output = pipeline.process_text(&transcript_file(), &block.repeat(3), "t");

    // Relevance lowers the score but never structural validity, and the
    // default threshold still admits the text
    let FileOutput::Processed { chunks, .. } = output else {
        panic!("expected processed output");
    };
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].quality_score < 0.5);
}

#[test]
fn test_noise_paragraph_rejected_at_chunk_tier() {
    let pipeline = FilePipeline::for_profile(&profile());

    let text = format!("{}\n\nok then.", fixtures::TRANSCRIPT);
    let output = pipeline.process_text(&transcript_file(), &text, "t");

    let FileOutput::Processed {
        chunks,
        chunks_rejected,
        ..
    } = output
    else {
        panic!("expected processed output");
    };

    // The document passes as a whole; the tiny second paragraph fails
    // chunk validation and is dropped
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks_rejected, 1);
    assert!(chunks[0].text.contains("mash"));
}

#[test]
fn test_raised_threshold_rejects_valid_text() {
    let mut profile = profile();
    profile.chunking.quality_threshold = 0.95;
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::TRANSCRIPT, "t");

    let FileOutput::Rejected { score, issues } = output else {
        panic!("expected rejected output");
    };
    // Structurally clean, just below the bar
    assert!(issues.is_empty());
    assert!(score > 0.0);
}

// Chunk geometry through the full pipeline
//
// Sentence buffering, overlap carry, paragraph isolation, and the
// character-window fallback, all with real preset profiles.

use crate::common::fixtures;
use brewsync::core::pipeline::{FileOutput, FilePipeline};
use brewsync::core::presets::{InputConfig, PresetName, ProcessingProfile};
use brewsync::core::types::{ContentType, SourceFile, TextChunk};
use std::path::PathBuf;

fn input() -> InputConfig {
    InputConfig {
        include_patterns: vec!["*.txt".to_string()],
        exclude_patterns: vec![],
        max_file_size_mb: 10,
    }
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

fn chunks_of(output: FileOutput) -> Vec<TextChunk> {
    match output {
        FileOutput::Processed { chunks, .. } => chunks,
        other => panic!("expected processed output, got {other:?}"),
    }
}

#[test]
fn test_transcript_fits_single_preset_chunk() {
    let profile = ProcessingProfile::from_preset(PresetName::VideoTranscript, input());
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::TRANSCRIPT, "t");
    let chunks = chunks_of(output);

    assert_eq!(chunks.len(), 1);
    // Default preprocessing lowercases the text
    assert!(chunks[0].text.contains("mash"));
    assert!(!chunks[0].text.contains("Mash"));
    assert_eq!(chunks[0].sequence_index, 0);
}

#[test]
fn test_small_geometry_closes_before_overflow() {
    let mut profile = ProcessingProfile::from_preset(PresetName::VideoTranscript, input());
    profile.chunking.max_chunk_size = 200;
    profile.chunking.min_chunk_size = 50;
    profile.chunking.overlap_size = 0;
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::SIX_SENTENCES, "t");

    let FileOutput::Processed {
        chunks,
        chunks_rejected,
        ..
    } = output
    else {
        panic!("expected processed output");
    };

    assert_eq!(chunks.len(), 3, "six ~70-char sentences pack two per chunk");
    assert_eq!(chunks_rejected, 0);
    for (index, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.sequence_index, index);
        assert!(chunk.text.chars().count() <= 200);
    }
}

#[test]
fn test_overlap_carries_sentences_across_chunks() {
    let mut profile = ProcessingProfile::from_preset(PresetName::VideoTranscript, input());
    profile.chunking.max_chunk_size = 200;
    profile.chunking.min_chunk_size = 50;
    profile.chunking.overlap_size = 80;
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::SIX_SENTENCES, "t");

    let FileOutput::Processed {
        chunks,
        chunks_rejected,
        ..
    } = output
    else {
        panic!("expected processed output");
    };

    // Each close reseeds the buffer with one trailing sentence, so the
    // six sentences cascade into five overlapping chunks
    assert_eq!(chunks.len(), 5);
    assert_eq!(chunks_rejected, 0);

    // The second sentence appears in both of the first two chunks
    assert!(chunks[0].text.contains("bittering addition"));
    assert!(chunks[1].text.starts_with("hops for the bittering"));

    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 200);
    }
}

#[test]
fn test_paragraph_boundary_blocks_overlap() {
    let mut profile = ProcessingProfile::from_preset(PresetName::VideoTranscript, input());
    profile.chunking.max_chunk_size = 200;
    profile.chunking.min_chunk_size = 50;
    profile.chunking.overlap_size = 80;
    let pipeline = FilePipeline::for_profile(&profile);

    let closing = "The final cleaning notes for the kegs went into the brewing logbook.";
    let text = format!("{}\n\n{}", fixtures::SIX_SENTENCES, closing);

    let chunks = chunks_of(pipeline.process_text(&transcript_file(), &text, "t"));

    // Five chunks from the first paragraph plus the second on its own,
    // with no overlap bleeding across the blank line
    assert_eq!(chunks.len(), 6);
    assert_eq!(
        chunks[5].text,
        "the final cleaning notes for the kegs went into the brewing logbook."
    );
}

#[test]
fn test_character_window_fallback() {
    let mut profile = ProcessingProfile::from_preset(PresetName::FastProcessing, input());
    profile.chunking.max_chunk_size = 200;
    profile.chunking.min_chunk_size = 40;
    profile.chunking.overlap_size = 40;
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::TRANSCRIPT, "t");
    let chunks = chunks_of(output);

    // fast_processing strips stopwords, then slides a character window
    assert!(chunks.len() >= 2);
    assert_eq!(chunks[0].text.chars().count(), 200);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 200);
        assert!(!chunk.text.contains(" the "));
    }
}

#[test]
fn test_sentence_cap_closes_chunks() {
    let mut profile = ProcessingProfile::from_preset(PresetName::VideoTranscript, input());
    profile.chunking.min_chunk_size = 50;
    profile.chunking.overlap_size = 0;
    profile.chunking.max_sentences_per_chunk = 2;
    let pipeline = FilePipeline::for_profile(&profile);

    let output = pipeline.process_text(&transcript_file(), fixtures::SIX_SENTENCES, "t");
    let chunks = chunks_of(output);

    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert_eq!(chunk.metadata.sentence_count, 2);
    }
}

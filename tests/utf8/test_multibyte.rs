// UTF-8 safety tests: Multi-byte characters
//
// CJK and accented text count as word characters, so they survive
// default preprocessing and must chunk on character boundaries.

use crate::common::fixtures;
use brewsync::core::pipeline::chunker::{split_sentences, Chunker};
use brewsync::core::pipeline::{FileOutput, FilePipeline};
use brewsync::core::presets::{ChunkingConfig, InputConfig, PresetName, ProcessingProfile};
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
fn test_cjk_survives_the_full_pipeline() {
    let pipeline = FilePipeline::for_profile(&profile());

    let output = pipeline.process_text(&transcript_file(), fixtures::CJK_TRANSCRIPT, "t");

    let FileOutput::Processed { chunks, .. } = output else {
        panic!("expected processed output");
    };
    let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert!(joined.contains("糖化休止"));
    assert!(joined.contains("酵母"));
    for chunk in &chunks {
        assert_eq!(chunk.content_hash.len(), 64);
    }
}

#[test]
fn test_pure_cjk_window_chunking_respects_char_bounds() {
    let config = ChunkingConfig {
        max_chunk_size: 4,
        min_chunk_size: 0,
        overlap_size: 1,
        max_sentences_per_chunk: 10,
        chunk_by_sentences: false,
        preserve_paragraphs: false,
        min_text_length: 0,
        max_text_length: 100000,
        quality_threshold: 0.0,
    };
    let chunker = Chunker::new(config);

    let chunks = chunker.chunk("糖化休止麦汁煮沸低温熟成酵母管理");

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 4);
        assert!(std::str::from_utf8(chunk.as_bytes()).is_ok());
    }
    assert_eq!(chunks[0], "糖化休止");
}

#[test]
fn test_accented_text_chunks_on_sentence_boundaries() {
    let sentences = split_sentences("Héllo wörld tëst. Ünïcode chàracters hère. Third önë.");
    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[0], "Héllo wörld tëst.");

    let config = ChunkingConfig {
        max_chunk_size: 25,
        min_chunk_size: 0,
        overlap_size: 0,
        max_sentences_per_chunk: 10,
        chunk_by_sentences: true,
        preserve_paragraphs: true,
        min_text_length: 0,
        max_text_length: 100000,
        quality_threshold: 0.0,
    };
    let chunker = Chunker::new(config);
    let chunks = chunker.chunk("Héllo wörld tëst. Ünïcode chàracters hère. Third önë.");

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(std::str::from_utf8(chunk.as_bytes()).is_ok());
    }
}

#[test]
fn test_nfkc_normalization_folds_compatibility_forms() {
    let pipeline = FilePipeline::for_profile(&profile());

    // Fullwidth letters and a ligature, as OCR output produces them
    let raw = format!("{} Ｔｈｅ ﬁnal ｇravity was low.", fixtures::TRANSCRIPT);
    let output = pipeline.process_text(&transcript_file(), &raw, "t");

    let FileOutput::Processed { chunks, .. } = output else {
        panic!("expected processed output");
    };
    let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert!(joined.contains("the final gravity was low"));
    assert!(!joined.contains('Ｔ'));
    assert!(!joined.contains('ﬁ'));
}

//! Integration tests for the pipeline's external adapters.
//!
//! The live tests call real provider APIs and are skipped by default.
//! Run with: cargo test --test recording_pipeline -- --ignored

use std::path::Path;
use voicebrief::summarization::{OpenAiSummarizer, Summarizer};
use voicebrief::transcription::{OpenAIProvider, Transcriber};

#[tokio::test]
#[ignore] // Requires OPENAI_API_KEY and a fixture at tests/fixtures/sample.mp3
async fn test_transcribe_fixture_against_live_api() {
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
    let fixture = Path::new("tests/fixtures/sample.mp3");
    assert!(fixture.exists(), "missing fixture: {:?}", fixture);

    let provider = OpenAIProvider::new(
        reqwest::Client::new(),
        api_key,
        None,
        "whisper-1".to_string(),
    );
    let transcriber = Transcriber::new(Box::new(provider));

    let transcript = transcriber.transcribe(fixture).await.unwrap();
    assert!(!transcript.is_empty(), "no transcription output");
}

#[tokio::test]
#[ignore] // Requires OPENAI_API_KEY
async fn test_summarize_against_live_api() {
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");

    let summarizer = OpenAiSummarizer::new(
        reqwest::Client::new(),
        api_key,
        None,
        "gpt-4o-mini".to_string(),
    );

    let summary = summarizer
        .summarize("Alice proposed shipping on Friday. Bob agreed. Carol will write the release notes.")
        .await
        .unwrap();
    assert!(!summary.is_empty(), "no summary output");
}

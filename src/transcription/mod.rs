use std::path::Path;
use thiserror::Error;
use tracing::info;

pub mod providers;

pub use providers::{OpenAIProvider, TranscriptionProvider};

#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The engine answered but produced no text. Downstream summarization
    /// on empty input is meaningless, so this is a failure rather than an
    /// empty-string success.
    #[error("speech engine returned an empty transcript")]
    Empty,
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

/// Wraps a transcription provider with the fixed language hint and the
/// empty-output check.
pub struct Transcriber {
    provider: Box<dyn TranscriptionProvider>,
    language: String,
}

impl Transcriber {
    pub fn new(provider: Box<dyn TranscriptionProvider>) -> Self {
        info!("Using {} for transcription", provider.name());
        Self {
            provider,
            language: "en".to_string(),
        }
    }

    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        info!(
            "Transcribing audio file: {:?} with {}",
            audio_path,
            self.provider.name()
        );

        let text = self
            .provider
            .transcribe(audio_path, &self.language)
            .await?;

        if text.trim().is_empty() {
            return Err(TranscriptionError::Empty);
        }

        Ok(text)
    }
}

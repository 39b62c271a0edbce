//! Transcript summarization via a text-generation engine.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_INSTRUCTION: &str = "You summarize meeting transcripts accurately and concisely. \
     Capture decisions, action items and the key discussion points.";

/// Token budget for the generated summary.
const SUMMARY_MAX_TOKENS: u32 = 300;

/// Low randomness keeps summaries stable for a given transcript.
const SUMMARY_TEMPERATURE: f32 = 0.2;

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    r#type: Option<String>,
}

pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        endpoint: Option<String>,
        model: String,
    ) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        info!("Initialized OpenAI summarizer with model: {}", model);

        Self {
            client,
            api_key,
            endpoint,
            model,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        info!("Summarizing transcript ({} chars)", transcript.len());

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to summarization engine")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read summarization response body")?;

        if !status.is_success() {
            error!(
                "Summarization request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(anyhow::anyhow!(
                    "Summarization engine error: {} (type: {:?})",
                    error_response.error.message,
                    error_response.error.r#type
                ));
            }

            return Err(anyhow::anyhow!(
                "Summarization request failed with status {}: {}",
                status,
                response_text
            ));
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .context("Failed to parse summarization response")?;

        let summary = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        if summary.is_empty() {
            return Err(anyhow::anyhow!("summarization engine returned no content"));
        }

        info!("Summary complete: {} chars", summary.len());
        debug!("Raw summary: {}", summary);

        Ok(summary)
    }
}

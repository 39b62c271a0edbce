//! Recording media retrieval from the conferencing provider.

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("media storage rejected the provided credentials (status {status})")]
    Authentication { status: u16 },
    #[error("recording media not found at {url}")]
    NotFound { url: String },
    #[error("transport failure: {0}")]
    Transport(anyhow::Error),
}

/// Downloads a finished recording from the provider's media storage.
/// Single attempt, no retries.
#[async_trait]
pub trait RecordingFetcher: Send + Sync {
    async fn fetch(&self, media_url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct TwilioMediaFetcher {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioMediaFetcher {
    pub fn new(client: reqwest::Client, account_sid: String, auth_token: String) -> Self {
        Self {
            client,
            account_sid,
            auth_token,
        }
    }
}

#[async_trait]
impl RecordingFetcher for TwilioMediaFetcher {
    async fn fetch(&self, media_url: &str) -> Result<Vec<u8>, FetchError> {
        // The callback delivers a bare media URL; appending .mp3 selects
        // the encoded download variant.
        let download_url = format!("{media_url}.mp3");
        info!("Downloading recording media from {}", download_url);

        let response = self
            .client
            .get(&download_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .context("Failed to request recording media")
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            error!("Media download rejected with status {}", status);
            return Err(FetchError::Authentication {
                status: status.as_u16(),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            error!("Recording media not found: {}", download_url);
            return Err(FetchError::NotFound { url: download_url });
        }
        if !status.is_success() {
            error!("Media download failed with status {}", status);
            return Err(FetchError::Transport(anyhow::anyhow!(
                "media download failed with status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read recording media body")
            .map_err(FetchError::Transport)?;

        debug!("Downloaded {} bytes of recording media", bytes.len());
        Ok(bytes.to_vec())
    }
}

//! Summary distribution by email.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

const DEFAULT_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Rendered notification content for one completed recording.
#[derive(Debug, Clone)]
pub struct MeetingDigest {
    pub recording_sid: String,
    pub transcript: String,
    pub summary: String,
}

impl MeetingDigest {
    pub fn subject(&self) -> String {
        let date = chrono::Local::now().format("%Y-%m-%d");
        format!("Meeting summary {} ({})", date, self.recording_sid)
    }

    pub fn body(&self) -> String {
        format!(
            "Summary\n-------\n{}\n\nFull transcript\n---------------\n{}\n",
            self.summary, self.transcript
        )
    }
}

/// Terminal record of a pipeline run's notification step.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub recipients: Vec<String>,
    pub delivered: bool,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// One multi-recipient send per run, not one send per recipient.
    async fn send(&self, digest: &MeetingDigest, recipients: &[String]) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct MailRequest {
    personalizations: Vec<Personalization>,
    from: Address,
    subject: String,
    content: Vec<MailContent>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<Address>,
}

#[derive(Debug, Serialize)]
struct Address {
    email: String,
}

#[derive(Debug, Serialize)]
struct MailContent {
    r#type: String,
    value: String,
}

pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    from_address: String,
}

impl SendGridMailer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        endpoint: Option<String>,
        from_address: String,
    ) -> Self {
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        info!("Initialized SendGrid mailer with sender: {}", from_address);

        Self {
            client,
            api_key,
            endpoint,
            from_address,
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, digest: &MeetingDigest, recipients: &[String]) -> Result<()> {
        info!(
            "Sending meeting digest for {} to {} recipient(s)",
            digest.recording_sid,
            recipients.len()
        );

        let body = MailRequest {
            personalizations: vec![Personalization {
                to: recipients
                    .iter()
                    .map(|email| Address {
                        email: email.clone(),
                    })
                    .collect(),
            }],
            from: Address {
                email: self.from_address.clone(),
            },
            subject: digest.subject(),
            content: vec![MailContent {
                r#type: "text/plain".to_string(),
                value: digest.body(),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to mail delivery service")?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!(
                "Mail delivery request failed with status {}: {}",
                status, response_text
            );
            return Err(anyhow::anyhow!(
                "mail delivery failed with status {status}: {response_text}"
            ));
        }

        info!("Meeting digest accepted for delivery");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest() -> MeetingDigest {
        MeetingDigest {
            recording_sid: "RE123".to_string(),
            transcript: "we agreed to ship on friday".to_string(),
            summary: "Ship date set to Friday.".to_string(),
        }
    }

    #[test]
    fn test_subject_names_the_recording() {
        assert!(digest().subject().contains("RE123"));
    }

    #[test]
    fn test_body_contains_summary_before_transcript() {
        let body = digest().body();
        let summary_at = body.find("Ship date set to Friday.").unwrap();
        let transcript_at = body.find("we agreed to ship on friday").unwrap();
        assert!(summary_at < transcript_at);
    }
}

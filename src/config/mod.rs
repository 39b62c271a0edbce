use anyhow::{Context, Result};
use tracing::info;

/// Service configuration, sourced entirely from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub twilio: TwilioConfig,
    pub openai: OpenAiConfig,
    pub mail: MailConfig,
    pub server: ServerConfig,
}

/// Credentials for the conferencing provider and its media storage.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub transcription_model: String,
    pub summary_model: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub from_address: String,
    pub recipients: Vec<String>,
    pub default_recipient: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Externally reachable base URL, used to register webhook callbacks
    /// with the conferencing provider.
    pub public_base_url: String,
    pub conference_room: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            twilio: TwilioConfig {
                account_sid: required("TWILIO_ACCOUNT_SID")?,
                auth_token: required("TWILIO_AUTH_TOKEN")?,
            },
            openai: OpenAiConfig {
                api_key: required("OPENAI_API_KEY")?,
                transcription_model: optional("OPENAI_TRANSCRIPTION_MODEL")
                    .unwrap_or_else(|| "whisper-1".to_string()),
                summary_model: optional("OPENAI_SUMMARY_MODEL")
                    .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            },
            mail: MailConfig {
                api_key: required("SENDGRID_API_KEY")?,
                from_address: required("MAIL_FROM")?,
                recipients: parse_recipients(&optional("MAIL_RECIPIENTS").unwrap_or_default()),
                default_recipient: required("MAIL_DEFAULT_RECIPIENT")?,
            },
            server: ServerConfig {
                port: match optional("PORT") {
                    Some(raw) => raw
                        .parse()
                        .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
                    None => 5005,
                },
                public_base_url: required("PUBLIC_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                conference_room: optional("CONFERENCE_ROOM")
                    .unwrap_or_else(|| "MeetingRoom".to_string()),
            },
        };

        info!(
            "Loaded configuration from environment ({} recipients configured)",
            config.mail.recipients.len()
        );
        Ok(config)
    }
}

impl MailConfig {
    /// Configured recipients, or the single default recipient when the
    /// list is empty.
    pub fn recipients_or_default(&self) -> Vec<String> {
        if self.recipients.is_empty() {
            vec![self.default_recipient.clone()]
        } else {
            self.recipients.clone()
        }
    }
}

fn required(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .with_context(|| format!("required environment variable {name} is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("required environment variable {name} is empty");
    }
    Ok(value)
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a comma-separated recipient list, trimming whitespace and
/// dropping empty entries.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipients_trims_and_drops_empties() {
        let parsed = parse_recipients(" a@example.com , ,b@example.com,");
        assert_eq!(parsed, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_parse_recipients_empty_input() {
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients(" , ,").is_empty());
    }

    #[test]
    fn test_recipients_fall_back_to_default() {
        let mail = MailConfig {
            api_key: "k".to_string(),
            from_address: "noreply@example.com".to_string(),
            recipients: vec![],
            default_recipient: "fallback@example.com".to_string(),
        };
        assert_eq!(mail.recipients_or_default(), vec!["fallback@example.com"]);
    }

    #[test]
    fn test_configured_recipients_win_over_default() {
        let mail = MailConfig {
            api_key: "k".to_string(),
            from_address: "noreply@example.com".to_string(),
            recipients: vec!["team@example.com".to_string()],
            default_recipient: "fallback@example.com".to_string(),
        };
        assert_eq!(mail.recipients_or_default(), vec!["team@example.com"]);
    }
}

use crate::api::ApiServer;
use crate::config::Config;
use crate::fetch::TwilioMediaFetcher;
use crate::notification::SendGridMailer;
use crate::pipeline::Orchestrator;
use crate::summarization::OpenAiSummarizer;
use crate::transcription::{OpenAIProvider, Transcriber};
use crate::twiml::ConferenceDirective;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Wires the external-service clients into an orchestrator and starts the
/// webhook server. All clients are constructed here and injected; nothing
/// lives in process-global state.
pub async fn run_service(config: Config, port_override: Option<u16>) -> Result<()> {
    info!("Starting voicebrief service");

    let port = port_override.unwrap_or(config.server.port);

    let fetcher = TwilioMediaFetcher::new(
        reqwest::Client::new(),
        config.twilio.account_sid.clone(),
        config.twilio.auth_token.clone(),
    );

    let provider = OpenAIProvider::new(
        reqwest::Client::new(),
        config.openai.api_key.clone(),
        None,
        config.openai.transcription_model.clone(),
    );
    let transcriber = Transcriber::new(Box::new(provider));

    let summarizer = OpenAiSummarizer::new(
        reqwest::Client::new(),
        config.openai.api_key.clone(),
        None,
        config.openai.summary_model.clone(),
    );

    let mailer = SendGridMailer::new(
        reqwest::Client::new(),
        config.mail.api_key.clone(),
        None,
        config.mail.from_address.clone(),
    );

    let orchestrator = Arc::new(Orchestrator::new(
        Box::new(fetcher),
        transcriber,
        Box::new(summarizer),
        Box::new(mailer),
        config.mail.recipients_or_default(),
    ));

    let directive = ConferenceDirective::new(
        config.server.conference_room.clone(),
        &config.server.public_base_url,
    );

    ApiServer::new(orchestrator, directive, port).start().await
}

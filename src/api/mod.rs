//! Webhook dispatcher for the conferencing provider.
//!
//! Provides HTTP endpoints for:
//! - Bridging callers into the conference (POST /join-conference)
//! - Recording status callbacks (POST /recording-callback)
//! - Conference status callbacks (POST /conference-status)
//! - Liveness (GET /)

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;

use crate::pipeline::Orchestrator;
use crate::twiml::ConferenceDirective;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub directive: ConferenceDirective,
}

pub struct ApiServer {
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(orchestrator: Arc<Orchestrator>, directive: ConferenceDirective, port: u16) -> Self {
        Self {
            port,
            state: AppState {
                orchestrator,
                directive,
            },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(liveness))
            .merge(routes::conference::router(self.state.clone()))
            .merge(routes::recording::router(self.state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", self.port)).await?;

        info!("Webhook server listening on http://0.0.0.0:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                    - Liveness");
        info!("  POST /join-conference     - Bridge caller into the conference");
        info!("  POST /recording-callback  - Recording status events");
        info!("  POST /conference-status   - Conference status events");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn liveness() -> &'static str {
    "Voice meeting summarizer is running"
}

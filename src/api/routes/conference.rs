//! Conference webhook endpoints.
//!
//! Provides HTTP endpoints for:
//! - Bridging an incoming caller into the conference (POST /join-conference)
//! - Conference lifecycle notifications (POST /conference-status)

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::api::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/join-conference", post(join_conference))
        .route("/conference-status", post(conference_status))
        .with_state(state)
}

/// Answers an incoming call with the conferencing-control document that
/// bridges the caller into the shared room and registers our callbacks.
async fn join_conference(State(state): State<AppState>) -> impl IntoResponse {
    info!(
        "Caller joining conference room '{}'",
        state.directive.room()
    );

    (
        [(header::CONTENT_TYPE, "text/xml")],
        state.directive.to_xml(),
    )
}

#[derive(Debug, Deserialize)]
pub struct ConferenceStatusForm {
    #[serde(rename = "ConferenceSid")]
    pub conference_sid: Option<String>,
    #[serde(rename = "StatusCallbackEvent")]
    pub event: Option<String>,
}

/// Log-only acknowledgement; conference lifecycle events carry no
/// business effect for the pipeline.
async fn conference_status(Form(form): Form<ConferenceStatusForm>) -> &'static str {
    info!(
        "Conference {} event: {}",
        form.conference_sid.as_deref().unwrap_or("<unknown>"),
        form.event.as_deref().unwrap_or("<unknown>")
    );

    "OK"
}

//! HTTP gateway (Axum) for the complaint form and the JSON API.
//!
//! This module is primarily used by the `triage` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod page;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    feedback_api_handler, feedback_count_handler, feedback_form_handler, index_handler,
    predict_api_handler, predict_form_handler,
};
pub use state::HandlerState;

use crate::constants::{TRIAGE_STATUS_HEADER, TRIAGE_STATUS_HEALTHY, TRIAGE_STATUS_READY};
use crate::model::{ProbabilisticClassifier, TextVectorizer};

pub fn create_router_with_state<V, C>(state: HandlerState<V, C>) -> Router
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(predict_form_handler))
        .route("/feedback", post(feedback_form_handler))
        .route("/v1/predict", post(predict_api_handler))
        .route("/v1/feedback", post(feedback_api_handler))
        .route("/v1/feedback/count", get(feedback_count_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub model: &'static str,
    pub classes: usize,
    pub features: usize,
    pub suggestions: &'static str,
    pub feedback: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        TRIAGE_STATUS_HEADER,
        HeaderValue::from_static(TRIAGE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Artifacts are loaded before the router exists, so a running server is ready.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<V, C>(State(state): State<HandlerState<V, C>>) -> Response
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    let gatekeeper = &state.gatekeeper;
    let components = ComponentStatus {
        http: TRIAGE_STATUS_READY,
        model: TRIAGE_STATUS_READY,
        classes: gatekeeper.classes().len(),
        features: gatekeeper.classifier().n_features(),
        suggestions: enabled_str(state.suggestions.is_some()),
        feedback: enabled_str(state.feedback_enabled()),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        TRIAGE_STATUS_HEADER,
        HeaderValue::from_static(TRIAGE_STATUS_READY),
    );

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}

fn enabled_str(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::TRIAGE_STATUS_HEADER;
use crate::feedback::FeedbackError;
use crate::gatekeeper::GateError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Gate(#[from] GateError),

    #[error("feedback logging is disabled")]
    FeedbackDisabled,

    #[error("feedback failed: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub status: &'static str,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Gate(gate) if gate.is_rejection() => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::FeedbackDisabled => StatusCode::NOT_FOUND,
            GatewayError::Feedback(FeedbackError::Invalid { .. }) => StatusCode::BAD_REQUEST,
            GatewayError::Gate(_) | GatewayError::Feedback(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Value of the status header.
    pub fn triage_status(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Gate(gate) => gate.code(),
            GatewayError::FeedbackDisabled => "feedback_disabled",
            GatewayError::Feedback(FeedbackError::Invalid { .. }) => "invalid_feedback",
            GatewayError::Feedback(_) => "feedback_error",
            GatewayError::InternalError(_) => "internal_error",
        }
    }

    /// Text shown to the client. Gate errors use the form wording.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Gate(gate) => gate.user_message().to_string(),
            other => other.to_string(),
        }
    }

    pub(crate) fn log_if_server_error(&self) {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let triage_status = self.triage_status();
        self.log_if_server_error();

        let error = match &self {
            GatewayError::Gate(gate) if gate.is_rejection() => gate.user_message().to_string(),
            other => other.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(TRIAGE_STATUS_HEADER, HeaderValue::from_static(triage_status));

        let body = Json(ErrorResponse {
            error,
            code: status.as_u16(),
            status: triage_status,
        });

        (status, headers, body).into_response()
    }
}

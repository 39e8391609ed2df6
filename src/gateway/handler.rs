use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::constants::{
    TRIAGE_STATUS_COUNTED, TRIAGE_STATUS_FORM, TRIAGE_STATUS_HEADER, TRIAGE_STATUS_PREDICTED,
    TRIAGE_STATUS_RECORDED,
};
use crate::feedback::{FeedbackLog, FeedbackRecord};
use crate::gatekeeper::{Alternative, PredictionResult};
use crate::gateway::error::GatewayError;
use crate::gateway::page::{self, Outcome, PageView};
use crate::gateway::state::HandlerState;
use crate::model::{ProbabilisticClassifier, TextVectorizer};

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub complaint: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: String,
    pub confidence: f32,
    pub confidence_percent: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub predicted_label: String,
    /// Radio value, `yes` or `no`.
    pub correct: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub input: String,
    pub predicted_label: String,
    pub correct: bool,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub recorded: bool,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct FeedbackCountResponse {
    pub total: usize,
}

#[instrument(skip(state))]
pub async fn index_handler<V, C>(State(state): State<HandlerState<V, C>>) -> Response
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    let html = page::render(&PageView {
        feedback_enabled: state.feedback_enabled(),
        ..PageView::default()
    });
    html_response(html, TRIAGE_STATUS_FORM)
}

#[instrument(skip(state, form), fields(chars = form.complaint.chars().count()))]
pub async fn predict_form_handler<V, C>(
    State(state): State<HandlerState<V, C>>,
    Form(form): Form<PredictForm>,
) -> Response
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    match state.gatekeeper.evaluate(&form.complaint) {
        Ok(result) => {
            let html = page::render(&PageView {
                complaint: &form.complaint,
                outcome: Some(Outcome::Prediction {
                    result: &result,
                    suggestion: state.suggestion_for(&result.label),
                }),
                feedback_enabled: state.feedback_enabled(),
            });
            html_response(html, TRIAGE_STATUS_PREDICTED)
        }
        Err(err) if err.is_rejection() => {
            debug!(reason = err.code(), "Complaint rejected");
            let html = page::render(&PageView {
                complaint: &form.complaint,
                outcome: Some(Outcome::Rejected {
                    message: err.user_message(),
                }),
                feedback_enabled: state.feedback_enabled(),
            });
            html_response(html, err.code())
        }
        Err(err) => error_page(err.into(), &form.complaint),
    }
}

#[instrument(skip(state, request), fields(chars = request.text.chars().count()))]
pub async fn predict_api_handler<V, C>(
    State(state): State<HandlerState<V, C>>,
    Json(request): Json<PredictRequest>,
) -> Result<Response, GatewayError>
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    let result = state.gatekeeper.evaluate(&request.text)?;
    let suggestion = state.suggestion_for(&result.label).map(str::to_string);
    let body = prediction_response(result, suggestion);

    Ok(json_response(StatusCode::OK, body, TRIAGE_STATUS_PREDICTED))
}

#[instrument(skip(state, form), fields(label = %form.predicted_label))]
pub async fn feedback_form_handler<V, C>(
    State(state): State<HandlerState<V, C>>,
    Form(form): Form<FeedbackForm>,
) -> Response
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    let complaint = form.input.clone();
    match record_form_feedback(state.feedback.clone(), form).await {
        Ok(total) => {
            let html = page::render(&PageView {
                complaint: &complaint,
                outcome: Some(Outcome::FeedbackRecorded { total }),
                feedback_enabled: true,
            });
            html_response(html, TRIAGE_STATUS_RECORDED)
        }
        Err(err) => error_page(err, &complaint),
    }
}

async fn record_form_feedback(
    log: Option<Arc<FeedbackLog>>,
    form: FeedbackForm,
) -> Result<usize, GatewayError> {
    let log = log.ok_or(GatewayError::FeedbackDisabled)?;
    let correct = parse_yes_no(&form.correct).ok_or_else(|| {
        GatewayError::InvalidRequest(format!(
            "correct must be yes or no, got {:?}",
            form.correct
        ))
    })?;

    let record = FeedbackRecord::new(
        form.input,
        form.predicted_label,
        correct,
        form.comment.unwrap_or_default(),
    );
    append_feedback(log, record).await
}

#[instrument(skip(state, request), fields(label = %request.predicted_label))]
pub async fn feedback_api_handler<V, C>(
    State(state): State<HandlerState<V, C>>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Response, GatewayError>
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    let log = state.feedback.clone().ok_or(GatewayError::FeedbackDisabled)?;
    let record = FeedbackRecord::new(
        request.input,
        request.predicted_label,
        request.correct,
        request.comment,
    );
    let total = append_feedback(log, record).await?;

    Ok(json_response(
        StatusCode::OK,
        FeedbackResponse {
            recorded: true,
            total,
        },
        TRIAGE_STATUS_RECORDED,
    ))
}

#[instrument(skip(state))]
pub async fn feedback_count_handler<V, C>(
    State(state): State<HandlerState<V, C>>,
) -> Result<Response, GatewayError>
where
    V: TextVectorizer + 'static,
    C: ProbabilisticClassifier + 'static,
{
    let log = state.feedback.clone().ok_or(GatewayError::FeedbackDisabled)?;
    let total = tokio::task::spawn_blocking(move || log.count())
        .await
        .map_err(|e| GatewayError::InternalError(format!("feedback task failed: {}", e)))??;

    Ok(json_response(
        StatusCode::OK,
        FeedbackCountResponse { total },
        TRIAGE_STATUS_COUNTED,
    ))
}

pub(crate) fn prediction_response(
    result: PredictionResult,
    suggestion: Option<String>,
) -> PredictResponse {
    PredictResponse {
        confidence_percent: result.confidence_percent(),
        label: result.label,
        confidence: result.confidence,
        suggestion,
        alternatives: result.alternatives,
    }
}

pub(crate) fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

async fn append_feedback(
    log: Arc<FeedbackLog>,
    record: FeedbackRecord,
) -> Result<usize, GatewayError> {
    tokio::task::spawn_blocking(move || log.append(&record))
        .await
        .map_err(|e| {
            warn!(error = %e, "Feedback task panicked");
            GatewayError::InternalError(format!("feedback task failed: {}", e))
        })?
        .map_err(GatewayError::from)
}

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TRIAGE_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

/// Form page carrying the error message, under the error's HTTP status.
fn error_page(err: GatewayError, complaint: &str) -> Response {
    err.log_if_server_error();
    let message = err.public_message();
    let html = page::render(&PageView {
        complaint,
        outcome: Some(Outcome::Rejected { message: &message }),
        feedback_enabled: false,
    });
    (
        err.status_code(),
        status_headers(err.triage_status()),
        Html(html),
    )
        .into_response()
}

fn html_response(html: String, status: &'static str) -> Response {
    (StatusCode::OK, status_headers(status), Html(html)).into_response()
}

fn json_response<T: Serialize>(code: StatusCode, body: T, status: &'static str) -> Response {
    (code, status_headers(status), Json(body)).into_response()
}

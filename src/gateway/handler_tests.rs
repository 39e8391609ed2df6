//! Router-level tests for the gateway handlers.
//!
//! Requests go through `create_router_with_state` with `tower::ServiceExt::oneshot`,
//! backed by the mock vectorizer and classifier.

use axum::{Router, body::Body, http::Request, http::StatusCode, response::Response};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::constants::TRIAGE_STATUS_HEADER;
use crate::feedback::{FeedbackLog, FeedbackRecord};
use crate::gatekeeper::{GateConfig, Gatekeeper};
use crate::gateway::create_router_with_state;
use crate::gateway::state::HandlerState;
use crate::model::{MockClassifier, MockVectorizer};
use crate::suggestions::SuggestionTable;

type MockState = HandlerState<MockVectorizer, MockClassifier>;

const VOCABULARY: [&str; 6] = ["engine", "cranks", "start", "burning", "smell", "brake"];
const CLASSES: [&str; 4] = [
    "Brake issue",
    "Weak battery",
    "Engine overheating",
    "Suspension issue",
];
const COMPLAINT: &str = "engine cranks but won't start, burning smell";

fn state_with_probabilities(probabilities: Vec<f32>) -> MockState {
    let vectorizer = MockVectorizer::new(VOCABULARY);
    let classifier = MockClassifier::new(VOCABULARY.len(), CLASSES, probabilities);
    let gatekeeper = Gatekeeper::new(vectorizer, classifier, GateConfig::default()).unwrap();
    HandlerState::new(Arc::new(gatekeeper))
}

fn confident_state() -> MockState {
    state_with_probabilities(vec![0.18, 0.62, 0.15, 0.05])
}

fn with_feedback(state: MockState) -> (MockState, TempDir) {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("feedback.jsonl"));
    (state.with_feedback(log), dir)
}

fn create_test_router(state: MockState) -> Router {
    create_router_with_state(state)
}

async fn get(router: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn post_json(router: &Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

async fn post_form(router: &Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

fn triage_status(response: &Response) -> String {
    response
        .headers()
        .get(TRIAGE_STATUS_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_test_router(confident_state());

        let response = get(&router, "/healthz").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "healthy");
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_endpoint_reports_components() {
        let state = confident_state().with_suggestions(SuggestionTable::builtin());
        let router = create_test_router(state);

        let response = get(&router, "/ready").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "ready");
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["components"]["model"], "ready");
        assert_eq!(body["components"]["classes"], 4);
        assert_eq!(body["components"]["features"], 6);
        assert_eq!(body["components"]["suggestions"], "enabled");
        assert_eq!(body["components"]["feedback"], "disabled");
    }
}

mod form_tests {
    use super::*;

    #[tokio::test]
    async fn test_index_renders_form() {
        let router = create_test_router(confident_state());

        let response = get(&router, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "form");
        let html = body_text(response).await;
        assert!(html.contains("Car Issue Predictor"));
        assert!(html.contains(r#"name="complaint""#));
    }

    #[tokio::test]
    async fn test_predict_form_success() {
        let state = confident_state().with_suggestions(SuggestionTable::builtin());
        let router = create_test_router(state);

        let response = post_form(
            &router,
            "/predict",
            "complaint=engine+cranks+but+won%27t+start%2C+burning+smell",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "predicted");
        let html = body_text(response).await;
        assert!(html.contains("<strong>Weak battery</strong> (62.0%)"));
        assert!(html.contains("Check battery voltage"));
        assert!(html.contains("<li>Brake issue (18.0%)</li>"));
        assert!(html.contains("<li>Engine overheating (15.0%)</li>"));
        assert!(!html.contains("Suspension issue (5.0%)"));
    }

    #[tokio::test]
    async fn test_predict_form_too_short_renders_message() {
        let router = create_test_router(confident_state());

        let response = post_form(&router, "/predict", "complaint=++ab++").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "too_short");
        let html = body_text(response).await;
        assert!(html.contains("Please enter a valid complaint."));
        assert!(!html.contains("Likely Issue"));
    }

    #[tokio::test]
    async fn test_predict_form_too_vague_renders_message() {
        let router = create_test_router(confident_state());

        let response = post_form(&router, "/predict", "complaint=asgfsafa+qwerty").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "too_vague");
        let html = body_text(response).await;
        assert!(html.contains("Input too vague or contains unknown words."));
    }

    #[tokio::test]
    async fn test_predict_form_low_confidence_hides_label() {
        let state = state_with_probabilities(vec![0.30, 0.30, 0.25, 0.15]);
        let router = create_test_router(state);

        let response = post_form(&router, "/predict", "complaint=brake+smell").await;

        assert_eq!(triage_status(&response), "low_confidence");
        let html = body_text(response).await;
        assert!(html.contains("Low confidence. Please add more details."));
        assert!(!html.contains("Brake issue"));
    }

    #[tokio::test]
    async fn test_predict_form_offers_feedback_when_enabled() {
        let (state, _dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        let response = post_form(&router, "/predict", "complaint=engine+cranks").await;

        let html = body_text(response).await;
        assert!(html.contains(r#"action="/feedback""#));
        assert!(html.contains(r#"name="input" value="engine cranks""#));
    }

    #[tokio::test]
    async fn test_feedback_form_records_entry() {
        let (state, dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        let response = post_form(
            &router,
            "/feedback",
            "input=engine+cranks&predicted_label=Weak+battery&correct=no&comment=was+the+starter",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "recorded");
        assert!(body_text(response).await.contains("Total feedback received: 1"));

        let records = FeedbackLog::new(dir.path().join("feedback.jsonl"))
            .read_all()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].input, "engine cranks");
        assert!(!records[0].correct);
        assert_eq!(records[0].comment, "was the starter");
    }

    #[tokio::test]
    async fn test_feedback_form_rejects_unknown_verdict() {
        let (state, _dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        let response = post_form(
            &router,
            "/feedback",
            "input=x&predicted_label=Weak+battery&correct=maybe",
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(triage_status(&response), "invalid_request");
        let html = body_text(response).await;
        assert!(html.contains("<h1>Car Issue Predictor</h1>"));
        assert!(html.contains("correct must be yes or no"));
    }

    #[tokio::test]
    async fn test_feedback_form_empty_label_renders_page() {
        let (state, dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        let response = post_form(&router, "/feedback", "input=x&predicted_label=&correct=yes").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(triage_status(&response), "invalid_feedback");
        let html = body_text(response).await;
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("predicted_label is empty"));
        assert!(!dir.path().join("feedback.jsonl").exists());
    }

    #[tokio::test]
    async fn test_predict_form_model_fault_renders_page() {
        let router = create_test_router(state_with_probabilities(vec![f32::NAN, 0.3, 0.2, 0.1]));

        let response = post_form(&router, "/predict", "complaint=brake+smell").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(triage_status(&response), "model_error");
        let html = body_text(response).await;
        assert!(html.contains("The prediction service is unavailable."));
        assert!(html.contains(r#"name="complaint""#));
        assert!(!html.contains("Likely Issue"));
    }

    #[tokio::test]
    async fn test_feedback_form_disabled() {
        let router = create_test_router(confident_state());

        let response = post_form(
            &router,
            "/feedback",
            "input=x&predicted_label=Weak+battery&correct=yes",
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(triage_status(&response), "feedback_disabled");
        assert!(body_text(response).await.contains("feedback logging is disabled"));
    }
}

mod api_tests {
    use super::*;

    #[tokio::test]
    async fn test_predict_api_success() {
        let state = confident_state().with_suggestions(SuggestionTable::builtin());
        let router = create_test_router(state);

        let response = post_json(&router, "/v1/predict", serde_json::json!({ "text": COMPLAINT })).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "predicted");
        let body = body_json(response).await;
        assert_eq!(body["label"], "Weak battery");
        assert!((body["confidence"].as_f64().unwrap() - 0.62).abs() < 1e-6);
        assert!((body["confidence_percent"].as_f64().unwrap() - 62.0).abs() < 1e-3);
        assert_eq!(
            body["suggestion"],
            "Check battery voltage, clean terminals, try jump start. Replace if old."
        );

        let alternatives = body["alternatives"].as_array().unwrap();
        assert_eq!(alternatives.len(), 3);
        assert_eq!(alternatives[0]["label"], "Weak battery");
        assert_eq!(alternatives[1]["label"], "Brake issue");
        assert_eq!(alternatives[2]["label"], "Engine overheating");
    }

    #[tokio::test]
    async fn test_predict_api_without_suggestions() {
        let router = create_test_router(confident_state());

        let response = post_json(&router, "/v1/predict", serde_json::json!({ "text": COMPLAINT })).await;

        let body = body_json(response).await;
        assert_eq!(body["label"], "Weak battery");
        assert!(body.get("suggestion").is_none());
    }

    #[tokio::test]
    async fn test_predict_api_too_short() {
        let router = create_test_router(confident_state());

        let response = post_json(&router, "/v1/predict", serde_json::json!({ "text": "  ok " })).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(triage_status(&response), "too_short");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please enter a valid complaint.");
        assert_eq!(body["code"], 422);
        assert_eq!(body["status"], "too_short");
    }

    #[tokio::test]
    async fn test_predict_api_too_vague() {
        let router = create_test_router(confident_state());

        let response = post_json(
            &router,
            "/v1/predict",
            serde_json::json!({ "text": "the brake thing" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(triage_status(&response), "too_vague");
    }

    #[tokio::test]
    async fn test_predict_api_low_confidence() {
        let router = create_test_router(state_with_probabilities(vec![0.40, 0.30, 0.20, 0.10]));

        let response = post_json(&router, "/v1/predict", serde_json::json!({ "text": COMPLAINT })).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["status"], "low_confidence");
        assert_eq!(body["error"], "Low confidence. Please add more details.");
    }

    #[tokio::test]
    async fn test_predict_api_model_fault_is_server_error() {
        let router = create_test_router(state_with_probabilities(vec![0.9, 0.1]));

        let response = post_json(&router, "/v1/predict", serde_json::json!({ "text": COMPLAINT })).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(triage_status(&response), "model_error");
    }

    #[tokio::test]
    async fn test_predict_api_missing_text_field() {
        let router = create_test_router(confident_state());

        let response = post_json(&router, "/v1/predict", serde_json::json!({ "complaint": "x" })).await;

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_feedback_api_disabled() {
        let router = create_test_router(confident_state());

        let response = post_json(
            &router,
            "/v1/feedback",
            serde_json::json!({
                "input": COMPLAINT,
                "predicted_label": "Weak battery",
                "correct": true
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["status"], "feedback_disabled");

        let response = get(&router, "/v1/feedback/count").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feedback_api_running_total() {
        let (state, _dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        for expected in 1..=2 {
            let response = post_json(
                &router,
                "/v1/feedback",
                serde_json::json!({
                    "input": COMPLAINT,
                    "predicted_label": "Weak battery",
                    "correct": expected == 1,
                    "comment": "thanks"
                }),
            )
            .await;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(triage_status(&response), "recorded");
            let body = body_json(response).await;
            assert_eq!(body["recorded"], true);
            assert_eq!(body["total"], expected);
        }

        let response = get(&router, "/v1/feedback/count").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(triage_status(&response), "counted");
        assert_eq!(body_json(response).await["total"], 2);
    }

    #[tokio::test]
    async fn test_feedback_api_rejects_empty_label() {
        let (state, dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        let response = post_json(
            &router,
            "/v1/feedback",
            serde_json::json!({
                "input": COMPLAINT,
                "predicted_label": "",
                "correct": true
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(triage_status(&response), "invalid_feedback");
        assert!(!dir.path().join("feedback.jsonl").exists());
    }

    #[tokio::test]
    async fn test_feedback_api_comment_is_optional() {
        let (state, dir) = with_feedback(confident_state());
        let router = create_test_router(state);

        let response = post_json(
            &router,
            "/v1/feedback",
            serde_json::json!({
                "input": COMPLAINT,
                "predicted_label": "Weak battery",
                "correct": true
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let raw = std::fs::read_to_string(dir.path().join("feedback.jsonl")).unwrap();
        let record: FeedbackRecord = serde_json::from_str(raw.trim()).unwrap();
        assert_eq!(record.predicted_label, "Weak battery");
        assert!(record.comment.is_empty());
    }
}

mod helper_tests {
    use crate::gatekeeper::{Alternative, PredictionResult};
    use crate::gateway::handler::{parse_yes_no, prediction_response};

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("yes"), Some(true));
        assert_eq!(parse_yes_no(" YES "), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("false"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }

    #[test]
    fn test_prediction_response_keeps_alternatives() {
        let result = PredictionResult {
            label: "Brake issue".to_string(),
            confidence: 0.5,
            alternatives: vec![
                Alternative::new("Brake issue", 0.5),
                Alternative::new("Suspension issue", 0.3),
            ],
        };

        let response = prediction_response(result, None);

        assert_eq!(response.label, "Brake issue");
        assert!((response.confidence_percent - 50.0).abs() < 1e-4);
        assert_eq!(response.alternatives.len(), 2);
        assert!(response.suggestion.is_none());
    }
}

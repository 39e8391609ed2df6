//! Cross-cutting, shared constants.
//!
//! The gate thresholds were picked empirically. Treat them as tunable defaults
//! (see [`GateConfig`](crate::gatekeeper::GateConfig)), not as a contract.

/// Minimum trimmed complaint length, in characters.
pub const DEFAULT_MIN_INPUT_CHARS: usize = 3;

/// Minimum number of non-zero features after vectorization.
pub const DEFAULT_MIN_FEATURES: usize = 2;

/// Minimum arg-max probability for a prediction to be surfaced.
///
/// Earlier deployments also ran with `0.40`.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.45;

/// Number of ranked alternatives returned with a prediction.
pub const DEFAULT_TOP_K: usize = 3;

pub const DEFAULT_VECTORIZER_FILE: &str = "vectorizer.json";
pub const DEFAULT_MODEL_FILE: &str = "model.json";
pub const DEFAULT_ARTIFACT_DIR: &str = "./artifacts";
pub const DEFAULT_FEEDBACK_FILE: &str = "feedback.jsonl";

/// Response header carrying the outcome of a request.
pub const TRIAGE_STATUS_HEADER: &str = "x-triage-status";

pub const TRIAGE_STATUS_HEALTHY: &str = "healthy";
pub const TRIAGE_STATUS_READY: &str = "ready";
pub const TRIAGE_STATUS_PREDICTED: &str = "predicted";
pub const TRIAGE_STATUS_RECORDED: &str = "recorded";
pub const TRIAGE_STATUS_COUNTED: &str = "counted";
pub const TRIAGE_STATUS_FORM: &str = "form";

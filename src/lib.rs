//! Symptom triage library crate (used by the server and integration tests).
//!
//! Classifies free-text car complaints into a fault category, refusing to answer
//! when the input is too short, shares too little vocabulary with the model, or
//! the best class is not probable enough.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Gatekeeper`], [`GateConfig`], [`GateError`] - Rejection gates around the classifier
//! - [`PredictionResult`], [`Alternative`] - Accepted predictions
//!
//! ## Model
//! - [`TfidfVectorizer`], [`LinearClassifier`] - Pre-fitted artifacts read from JSON
//! - [`TextVectorizer`], [`ProbabilisticClassifier`] - Seams the gatekeeper depends on
//! - [`ModelArtifacts`] - Loads and cross-checks both artifacts
//!
//! ## Extras
//! - [`SuggestionTable`] - Remediation text per label
//! - [`FeedbackLog`], [`FeedbackRecord`] - Append-only JSON-lines feedback
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod feedback;
pub mod gatekeeper;
pub mod gateway;
pub mod model;
pub mod suggestions;

pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MIN_FEATURES, DEFAULT_MIN_INPUT_CHARS, DEFAULT_TOP_K,
    TRIAGE_STATUS_HEADER,
};
pub use feedback::{FeedbackError, FeedbackLog, FeedbackRecord};
pub use gatekeeper::{Alternative, GateConfig, GateError, Gatekeeper, PredictionResult};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
#[cfg(any(test, feature = "mock"))]
pub use model::{MockClassifier, MockVectorizer};
pub use model::{
    ArtifactError, LinearClassifier, ModelArtifacts, ModelError, ProbabilisticClassifier,
    SparseVector, TextVectorizer, TfidfVectorizer,
};
pub use suggestions::{DEFAULT_SUGGESTION, SuggestionTable};

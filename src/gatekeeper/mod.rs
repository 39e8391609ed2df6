//! Prediction gate: length check, vocabulary-overlap check, classification and
//! confidence check.
//!
//! The gatekeeper owns the vectorizer/classifier pair it is built with. Both are
//! loaded once at start-up and only read afterwards, so a single instance is shared
//! across requests behind an `Arc`.
//!
//! # Order of checks
//!
//! 1. Trimmed length below [`GateConfig::min_input_chars`] is `TooShort`. The
//!    vectorizer is not called.
//! 2. Fewer than [`GateConfig::min_features`] non-zero features is `TooVague`. The
//!    classifier is not called.
//! 3. Arg-max probability below [`GateConfig::confidence_threshold`] is
//!    `LowConfidence`, and no label is reported.

pub mod config;
pub mod error;
pub mod gate;
pub mod types;


pub use config::GateConfig;
pub use error::GateError;
pub use gate::{Gatekeeper, rank};
pub use types::{Alternative, PredictionResult};

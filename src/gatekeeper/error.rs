use thiserror::Error;

use crate::model::ModelError;

/// Why a complaint did not produce a prediction.
///
/// The first three variants are rejections of the input; the user is expected to
/// rephrase and resubmit. None of them is retried.
#[derive(Debug, Error, PartialEq)]
pub enum GateError {
    #[error("input too short: {length} characters (minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("input too vague: {nnz} known features (minimum {min})")]
    TooVague { nnz: usize, min: usize },

    #[error("low confidence: {confidence:.4} below threshold {threshold:.2}")]
    LowConfidence { confidence: f32, threshold: f32 },

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("invalid gate configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl GateError {
    /// `true` for input rejections, `false` for model or configuration faults.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GateError::TooShort { .. } | GateError::TooVague { .. } | GateError::LowConfidence { .. }
        )
    }

    /// Machine-readable code, also used as the status header value.
    pub fn code(&self) -> &'static str {
        match self {
            GateError::TooShort { .. } => "too_short",
            GateError::TooVague { .. } => "too_vague",
            GateError::LowConfidence { .. } => "low_confidence",
            GateError::Model(_) => "model_error",
            GateError::InvalidConfig { .. } => "invalid_config",
        }
    }

    /// Message shown to the person filling in the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            GateError::TooShort { .. } => "Please enter a valid complaint.",
            GateError::TooVague { .. } => {
                "Input too vague or contains unknown words. Describe real symptoms."
            }
            GateError::LowConfidence { .. } => "Low confidence. Please add more details.",
            GateError::Model(_) | GateError::InvalidConfig { .. } => {
                "The prediction service is unavailable. Please try again later."
            }
        }
    }
}

use serde::{Deserialize, Serialize};

/// One ranked class with its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub label: String,
    pub confidence: f32,
}

impl Alternative {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// Accepted prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Arg-max class.
    pub label: String,
    /// Arg-max probability, in `[0, 1]`.
    pub confidence: f32,
    /// Top classes by descending probability (includes the arg-max class first).
    pub alternatives: Vec<Alternative>,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

impl std::fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1}%)", self.label, self.confidence_percent())
    }
}

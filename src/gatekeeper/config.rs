use crate::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MIN_FEATURES, DEFAULT_MIN_INPUT_CHARS, DEFAULT_TOP_K,
};

/// Thresholds applied by the [`Gatekeeper`](super::Gatekeeper).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    /// Minimum trimmed input length in characters. Shorter input is `TooShort`.
    pub min_input_chars: usize,

    /// Minimum number of non-zero features. Fewer means the text barely overlaps the
    /// vocabulary and is rejected as `TooVague`.
    pub min_features: usize,

    /// Minimum arg-max probability. Below it the prediction is `LowConfidence`.
    pub confidence_threshold: f32,

    /// Number of ranked alternatives to return.
    pub top_k: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_input_chars: DEFAULT_MIN_INPUT_CHARS,
            min_features: DEFAULT_MIN_FEATURES,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl GateConfig {
    pub fn with_min_input_chars(mut self, min_input_chars: usize) -> Self {
        self.min_input_chars = min_input_chars;
        self
    }

    pub fn with_min_features(mut self, min_features: usize) -> Self {
        self.min_features = min_features;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            ));
        }
        if self.min_input_chars == 0 {
            return Err("min_input_chars must be at least 1".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }
        Ok(())
    }
}

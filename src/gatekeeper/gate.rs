use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::model::{ModelError, ProbabilisticClassifier, TextVectorizer, argmax};

use super::config::GateConfig;
use super::error::GateError;
use super::types::{Alternative, PredictionResult};

/// Runs a complaint through the length, vocabulary-overlap and confidence gates.
pub struct Gatekeeper<V, C> {
    vectorizer: V,
    classifier: C,
    config: GateConfig,
}

impl<V, C> std::fmt::Debug for Gatekeeper<V, C>
where
    V: TextVectorizer,
    C: ProbabilisticClassifier,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("n_features", &self.vectorizer.n_features())
            .field("classes", &self.classifier.classes().len())
            .field("config", &self.config)
            .finish()
    }
}

impl<V, C> Gatekeeper<V, C>
where
    V: TextVectorizer,
    C: ProbabilisticClassifier,
{
    pub fn new(vectorizer: V, classifier: C, config: GateConfig) -> Result<Self, GateError> {
        config
            .validate()
            .map_err(|reason| GateError::InvalidConfig { reason })?;

        if vectorizer.n_features() != classifier.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.n_features(),
            }
            .into());
        }

        Ok(Self {
            vectorizer,
            classifier,
            config,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn vectorizer(&self) -> &V {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Classifies `text`, or explains why no prediction is surfaced.
    pub fn evaluate(&self, text: &str) -> Result<PredictionResult, GateError> {
        let text = text.trim();
        let length = text.chars().count();
        if length < self.config.min_input_chars {
            debug!(length, min = self.config.min_input_chars, "Rejected: too short");
            return Err(GateError::TooShort {
                length,
                min: self.config.min_input_chars,
            });
        }

        let features = self.vectorizer.transform(text);
        let nnz = features.nnz();
        if nnz < self.config.min_features {
            debug!(nnz, min = self.config.min_features, "Rejected: too vague");
            return Err(GateError::TooVague {
                nnz,
                min: self.config.min_features,
            });
        }

        let probs = self.classifier.predict_proba(&features)?;
        let classes = self.classifier.classes();
        if probs.len() != classes.len() || probs.is_empty() {
            return Err(ModelError::ProbabilityCount {
                expected: classes.len(),
                actual: probs.len(),
            }
            .into());
        }
        if probs.iter().any(|p| !p.is_finite() || !(0.0..=1.0).contains(p)) {
            warn!(?probs, "Classifier returned probabilities outside [0, 1]");
            return Err(ModelError::NonFinite.into());
        }

        let best = argmax(&probs).ok_or(ModelError::NonFinite)?;
        let confidence = probs[best];
        if confidence < self.config.confidence_threshold {
            debug!(
                confidence,
                threshold = self.config.confidence_threshold,
                "Rejected: low confidence"
            );
            return Err(GateError::LowConfidence {
                confidence,
                threshold: self.config.confidence_threshold,
            });
        }

        let alternatives = rank(classes, &probs, self.config.top_k);
        let result = PredictionResult {
            label: classes[best].clone(),
            confidence,
            alternatives,
        };

        info!(
            label = %result.label,
            confidence = result.confidence,
            nnz,
            "Prediction accepted"
        );
        Ok(result)
    }
}

/// Top `k` classes by descending probability; equal probabilities keep class order.
pub fn rank(classes: &[String], probs: &[f32], k: usize) -> Vec<Alternative> {
    let mut order: Vec<usize> = (0..probs.len().min(classes.len())).collect();
    order.sort_by(|&a, &b| probs[b].partial_cmp(&probs[a]).unwrap_or(Ordering::Equal));
    order
        .into_iter()
        .take(k)
        .map(|i| Alternative::new(classes[i].clone(), probs[i]))
        .collect()
}

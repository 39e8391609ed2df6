use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ProbabilisticClassifier;
use super::artifacts::read_json;
use super::error::{ArtifactError, ModelError};
use super::sparse::SparseVector;

const ARTIFACT: &str = "classifier";

/// How one-vs-rest logistic scores are turned into probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    /// Softmax over all class scores.
    #[default]
    Multinomial,
    /// Independent sigmoids, renormalised to sum to one.
    Ovr,
}

/// On-disk description of a fitted linear text classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression {
        classes: Vec<String>,
        /// One row per class, or a single row for a binary model.
        coef: Vec<Vec<f32>>,
        intercept: Vec<f32>,
        #[serde(default)]
        multi_class: MultiClass,
    },
    MultinomialNb {
        classes: Vec<String>,
        class_log_prior: Vec<f32>,
        feature_log_prob: Vec<Vec<f32>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Softmax,
    /// Binary model with a single score for the second class.
    Sigmoid,
    OvrSigmoid,
}

/// Linear model over sparse features with a probabilistic output link.
///
/// Covers multinomial and binary logistic regression and multinomial naive Bayes
/// (whose joint log likelihood normalises with the same softmax).
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<String>,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
    n_features: usize,
    link: Link,
}

impl LinearClassifier {
    /// Reads and validates a classifier artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: ClassifierArtifact = read_json(path)?;
        let classifier = Self::from_artifact(artifact)?;
        info!(
            path = %path.display(),
            classes = classifier.classes.len(),
            n_features = classifier.n_features,
            link = ?classifier.link,
            "Classifier loaded"
        );
        Ok(classifier)
    }

    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self, ArtifactError> {
        match artifact {
            ClassifierArtifact::LogisticRegression {
                classes,
                coef,
                intercept,
                multi_class,
            } => {
                validate_classes(&classes)?;
                let link = if classes.len() == 2 && coef.len() == 1 {
                    Link::Sigmoid
                } else if coef.len() == classes.len() {
                    match multi_class {
                        MultiClass::Multinomial => Link::Softmax,
                        MultiClass::Ovr => Link::OvrSigmoid,
                    }
                } else {
                    return Err(ArtifactError::invalid(
                        ARTIFACT,
                        format!(
                            "coef has {} rows for {} classes",
                            coef.len(),
                            classes.len()
                        ),
                    ));
                };
                if intercept.len() != coef.len() {
                    return Err(ArtifactError::invalid(
                        ARTIFACT,
                        format!(
                            "intercept has {} entries, coef has {} rows",
                            intercept.len(),
                            coef.len()
                        ),
                    ));
                }
                Self::build(classes, coef, intercept, link)
            }
            ClassifierArtifact::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                validate_classes(&classes)?;
                if feature_log_prob.len() != classes.len() || class_log_prior.len() != classes.len()
                {
                    return Err(ArtifactError::invalid(
                        ARTIFACT,
                        format!(
                            "naive Bayes parameters do not match {} classes",
                            classes.len()
                        ),
                    ));
                }
                Self::build(classes, feature_log_prob, class_log_prior, Link::Softmax)
            }
        }
    }

    fn build(
        classes: Vec<String>,
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
        link: Link,
    ) -> Result<Self, ArtifactError> {
        let n_features = weights.first().map(Vec::len).unwrap_or(0);
        if n_features == 0 {
            return Err(ArtifactError::invalid(ARTIFACT, "weight rows are empty"));
        }
        if weights.iter().any(|row| row.len() != n_features) {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                "weight rows have differing lengths",
            ));
        }
        if weights.iter().flatten().chain(bias.iter()).any(|w| !w.is_finite()) {
            return Err(ArtifactError::invalid(ARTIFACT, "weights contain non-finite values"));
        }

        Ok(Self {
            classes,
            weights,
            bias,
            n_features,
            link,
        })
    }

    /// Raw per-row scores (`w . x + b`).
    pub fn decision_function(&self, features: &SparseVector) -> Result<Vec<f32>, ModelError> {
        if features.dim() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: features.dim(),
            });
        }
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| Ok(features.dot(row)? + b))
            .collect()
    }
}

impl ProbabilisticClassifier for LinearClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f32>, ModelError> {
        let scores = self.decision_function(features)?;
        let probs = match self.link {
            Link::Softmax => softmax(&scores),
            Link::Sigmoid => {
                let p = sigmoid(scores[0]);
                vec![1.0 - p, p]
            }
            Link::OvrSigmoid => {
                let raw: Vec<f32> = scores.iter().map(|s| sigmoid(*s)).collect();
                let total: f32 = raw.iter().sum();
                if total > 0.0 {
                    raw.iter().map(|p| p / total).collect()
                } else {
                    vec![1.0 / raw.len() as f32; raw.len()]
                }
            }
        };

        if probs.iter().any(|p| !p.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        Ok(probs)
    }
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if v.partial_cmp(&b) != Some(Ordering::Greater) => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn validate_classes(classes: &[String]) -> Result<(), ArtifactError> {
    if classes.len() < 2 {
        return Err(ArtifactError::invalid(
            ARTIFACT,
            format!("need at least 2 classes, got {}", classes.len()),
        ));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(ArtifactError::invalid(
            ARTIFACT,
            format!("duplicate class label '{}'", dup),
        ));
    }
    Ok(())
}

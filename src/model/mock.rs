use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::ModelError;
use super::sparse::SparseVector;
use super::{ProbabilisticClassifier, TextVectorizer};

/// Whitespace vectorizer over a fixed word list; each known word sets its column to 1.
#[derive(Debug, Default)]
pub struct MockVectorizer {
    vocabulary: Vec<String>,
    calls: AtomicUsize,
}

impl MockVectorizer {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `transform` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextVectorizer for MockVectorizer {
    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> SparseVector {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pairs = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter_map(|w| self.vocabulary.iter().position(|v| *v == w))
            .map(|i| (i, 1.0));
        SparseVector::from_pairs(self.vocabulary.len(), pairs)
            .unwrap_or_else(|_| SparseVector::zeros(self.vocabulary.len()))
    }
}

/// Classifier that returns the same probability vector for every input.
#[derive(Debug, Default)]
pub struct MockClassifier {
    classes: Vec<String>,
    probabilities: Vec<f32>,
    n_features: usize,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn new<S: Into<String>>(
        n_features: usize,
        classes: impl IntoIterator<Item = S>,
        probabilities: Vec<f32>,
    ) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            probabilities,
            n_features,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `predict_proba` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProbabilisticClassifier for MockClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f32>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if features.dim() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: features.dim(),
            });
        }
        Ok(self.probabilities.clone())
    }
}

//! Pre-fitted text model: a tf-idf vectorizer and a probabilistic linear classifier.
//!
//! Both are read from JSON artifacts at start-up (see [`ModelArtifacts::load`]) and
//! never mutated afterwards. The [`TextVectorizer`] and [`ProbabilisticClassifier`]
//! traits are the seams the [`Gatekeeper`](crate::gatekeeper::Gatekeeper) depends on.

pub mod artifacts;
pub mod classifier;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod sparse;
pub mod vectorizer;


pub use artifacts::{ModelArtifacts, resolve_artifact_path};
pub use classifier::{ClassifierArtifact, LinearClassifier, MultiClass, argmax};
pub use error::{ArtifactError, ModelError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockClassifier, MockVectorizer};
pub use sparse::SparseVector;
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerArtifact};

/// Turns raw text into sparse features.
pub trait TextVectorizer: Send + Sync {
    /// Output dimension.
    fn n_features(&self) -> usize;

    fn transform(&self, text: &str) -> SparseVector;
}

/// A trained classifier exposing per-class probabilities.
pub trait ProbabilisticClassifier: Send + Sync {
    /// Class labels, in the order probabilities are reported.
    fn classes(&self) -> &[String];

    /// Expected input dimension.
    fn n_features(&self) -> usize;

    /// One probability per entry of [`classes`](Self::classes), summing to one.
    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f32>, ModelError>;

    /// Arg-max label.
    fn predict(&self, features: &SparseVector) -> Result<&str, ModelError> {
        let probs = self.predict_proba(features)?;
        let classes = self.classes();
        if probs.len() != classes.len() {
            return Err(ModelError::ProbabilityCount {
                expected: classes.len(),
                actual: probs.len(),
            });
        }
        argmax(&probs)
            .map(|i| classes[i].as_str())
            .ok_or(ModelError::ProbabilityCount {
                expected: classes.len(),
                actual: 0,
            })
    }
}

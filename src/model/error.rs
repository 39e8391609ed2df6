use std::path::PathBuf;
use thiserror::Error;

/// Failure to locate, read or validate a model artifact.
///
/// Loading happens once at start-up; any of these is fatal for the process.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{artifact} artifact not found (tried: {})", join_paths(.candidates))]
    NotFound {
        artifact: &'static str,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact} artifact: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },

    #[error(
        "vectorizer produces {vectorizer} features but classifier expects {classifier}"
    )]
    DimensionMismatch { vectorizer: usize, classifier: usize },
}

impl ArtifactError {
    pub(crate) fn invalid(artifact: &'static str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            artifact,
            reason: reason.into(),
        }
    }
}

/// Runtime failure while vectorizing or classifying.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature index {index} out of bounds for dimension {dim}")]
    IndexOutOfBounds { index: usize, dim: usize },

    #[error("classifier returned {actual} probabilities for {expected} classes")]
    ProbabilityCount { expected: usize, actual: usize },

    #[error("classifier returned a non-finite or out-of-range probability")]
    NonFinite,
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

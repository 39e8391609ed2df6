use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::classifier::LinearClassifier;
use super::error::ArtifactError;
use super::vectorizer::TfidfVectorizer;
use super::{ProbabilisticClassifier, TextVectorizer};

/// Returns the first candidate that exists on disk.
pub fn resolve_artifact_path(
    artifact: &'static str,
    candidates: &[PathBuf],
) -> Result<PathBuf, ArtifactError> {
    for candidate in candidates {
        if candidate.is_file() {
            debug!(artifact, path = %candidate.display(), "Resolved artifact path");
            return Ok(candidate.clone());
        }
        debug!(artifact, path = %candidate.display(), "Artifact candidate missing");
    }
    Err(ArtifactError::NotFound {
        artifact,
        candidates: candidates.to_vec(),
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The fitted vectorizer/classifier pair, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearClassifier,
}

impl ModelArtifacts {
    /// Resolves both artifacts from their candidate lists and loads them.
    pub fn load(
        vectorizer_candidates: &[PathBuf],
        model_candidates: &[PathBuf],
    ) -> Result<Self, ArtifactError> {
        let vectorizer_path = resolve_artifact_path("vectorizer", vectorizer_candidates)?;
        let model_path = resolve_artifact_path("classifier", model_candidates)?;

        let vectorizer = TfidfVectorizer::load(&vectorizer_path)?;
        let classifier = LinearClassifier::load(&model_path)?;

        let artifacts = Self::from_parts(vectorizer, classifier)?;
        info!(
            vectorizer = %vectorizer_path.display(),
            classifier = %model_path.display(),
            "Model artifacts ready"
        );
        Ok(artifacts)
    }

    /// Pairs a vectorizer with a classifier, checking that their dimensions agree.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        classifier: LinearClassifier,
    ) -> Result<Self, ArtifactError> {
        if vectorizer.n_features() != classifier.n_features() {
            return Err(ArtifactError::DimensionMismatch {
                vectorizer: vectorizer.n_features(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn into_parts(self) -> (TfidfVectorizer, LinearClassifier) {
        (self.vectorizer, self.classifier)
    }
}

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TextVectorizer;
use super::artifacts::read_json;
use super::error::ArtifactError;
use super::sparse::SparseVector;

const ARTIFACT: &str = "vectorizer";

/// Row normalisation applied after tf-idf weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// On-disk description of a fitted tf-idf vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    /// Term -> column index.
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column. Absent means raw term frequencies.
    #[serde(default)]
    pub idf: Option<Vec<f32>>,

    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    /// Inclusive word n-gram range.
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default)]
    pub stop_words: Vec<String>,

    /// Use `1 + ln(tf)` instead of `tf`.
    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default)]
    pub norm: Norm,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl VectorizerArtifact {
    /// Unigram, lowercased, L2-normalised vocabulary without idf weights.
    pub fn from_vocabulary<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.into(), i))
            .collect();
        Self {
            vocabulary,
            idf: None,
            lowercase: default_lowercase(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            sublinear_tf: false,
            norm: Norm::default(),
        }
    }
}

/// Fitted tf-idf vectorizer.
///
/// Tokens are maximal runs of word characters (alphanumeric or `_`) of length two
/// or more. Stop words are removed before n-grams are formed.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f32>>,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    /// Reads and validates a vectorizer artifact.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: VectorizerArtifact = read_json(path)?;
        let vectorizer = Self::from_artifact(artifact)?;
        info!(
            path = %path.display(),
            vocabulary = vectorizer.vocabulary.len(),
            ngram_range = ?vectorizer.ngram_range,
            idf = vectorizer.idf.is_some(),
            "Vectorizer loaded"
        );
        Ok(vectorizer)
    }

    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ArtifactError> {
        let size = artifact.vocabulary.len();
        if size == 0 {
            return Err(ArtifactError::invalid(ARTIFACT, "vocabulary is empty"));
        }

        let mut seen = vec![false; size];
        for (term, &index) in &artifact.vocabulary {
            if index >= size {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("term '{}' has index {} >= vocabulary size {}", term, index, size),
                ));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("index {} is assigned to more than one term", index),
                ));
            }
        }

        if let Some(ref idf) = artifact.idf {
            if idf.len() != size {
                return Err(ArtifactError::invalid(
                    ARTIFACT,
                    format!("idf has {} entries, vocabulary has {}", idf.len(), size),
                ));
            }
            if idf.iter().any(|w| !w.is_finite()) {
                return Err(ArtifactError::invalid(ARTIFACT, "idf contains non-finite values"));
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::invalid(
                ARTIFACT,
                format!("ngram_range ({}, {}) must satisfy 1 <= min <= max", min_n, max_n),
            ));
        }

        let lowercase = artifact.lowercase;
        let stop_words = artifact
            .stop_words
            .into_iter()
            .map(|w| if lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase,
            ngram_range: artifact.ngram_range,
            stop_words,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Splits text into word tokens (after optional lowercasing).
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().nth(1).is_some())
            .map(str::to_string)
            .collect()
    }

    /// Produces the terms looked up in the vocabulary: stop words removed, then n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = self
            .tokenize(text)
            .into_iter()
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        if min_n == 1 && max_n == 1 {
            return tokens;
        }

        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        // Indices come from the validated vocabulary, so they are always in bounds.
        let mut vector = SparseVector::from_pairs(self.vocabulary.len(), counts)
            .unwrap_or_else(|_| SparseVector::zeros(self.vocabulary.len()));

        if self.sublinear_tf {
            vector.scale_values(|_, tf| 1.0 + tf.ln());
        }
        if let Some(ref idf) = self.idf {
            vector.scale_values(|i, tf| tf * idf[i]);
        }
        match self.norm {
            Norm::L2 => {
                let norm = vector.l2_norm();
                vector.normalize_by(norm);
            }
            Norm::L1 => {
                let norm = vector.l1_norm();
                vector.normalize_by(norm);
            }
            Norm::None => {}
        }

        debug!(
            text_len = text.len(),
            nnz = vector.nnz(),
            "Vectorized complaint"
        );
        vector
    }
}

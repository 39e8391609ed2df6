//! Small fitted model written to disk as JSON artifacts.
//!
//! Three classes over a thirteen-term vocabulary, no idf, l2 norm and zero
//! intercepts, so the probabilities below can be checked by hand.

use std::path::{Path, PathBuf};

use serde_json::json;

pub const CLASSES: [&str; 3] = ["Brake issue", "Weak battery", "Engine overheating"];

pub const VOCABULARY: [&str; 13] = [
    "brake",
    "squeal",
    "battery",
    "crank",
    "cranks",
    "start",
    "overheating",
    "coolant",
    "smell",
    "burning",
    "engine",
    "noise",
    "car",
];

/// Five known terms, arg-max `Weak battery` at roughly 0.938.
pub const BATTERY_COMPLAINT: &str = "engine cranks but won't start, burning smell";
/// Two known terms, arg-max `Brake issue` at roughly 0.972.
pub const BRAKE_COMPLAINT: &str = "brake squeal";
/// Two known terms with all-zero weights: uniform probabilities.
pub const UNIFORM_COMPLAINT: &str = "car noise";

pub fn vectorizer_json() -> serde_json::Value {
    let vocabulary: serde_json::Map<String, serde_json::Value> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), json!(i)))
        .collect();

    json!({
        "vocabulary": vocabulary,
        "lowercase": true,
        "norm": "l2"
    })
}

pub fn model_json() -> serde_json::Value {
    json!({
        "kind": "logistic_regression",
        "classes": CLASSES,
        "coef": [
            [3.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 3.0, 2.0, 3.0, 3.0, 0.0, 0.0, 1.0, 1.0, 0.5, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0, 3.0, 0.5, 0.5, 0.5, 0.0, 0.0]
        ],
        "intercept": [0.0, 0.0, 0.0],
        "multi_class": "multinomial"
    })
}

/// Writes `vectorizer.json` and `model.json` into `dir`.
pub fn write_artifacts(dir: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
    let vectorizer = dir.join("vectorizer.json");
    let model = dir.join("model.json");
    std::fs::write(&vectorizer, vectorizer_json().to_string())?;
    std::fs::write(&model, model_json().to_string())?;
    Ok((vectorizer, model))
}

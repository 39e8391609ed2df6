//! Canned remediation tips keyed by predicted label.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::model::ArtifactError;
use crate::model::artifacts::read_json;

/// Shown for labels without a dedicated entry.
pub const DEFAULT_SUGGESTION: &str = "Visit a workshop for diagnosis.";

const BUILTIN: &[(&str, &str)] = &[
    (
        "Weak battery",
        "Check battery voltage, clean terminals, try jump start. Replace if old.",
    ),
    (
        "Faulty spark plug",
        "Check spark plugs & wiring. Replace worn plugs.",
    ),
    (
        "Brake issue",
        "Inspect brake pads, discs, and fluid level. Avoid high speed driving.",
    ),
    (
        "Radiator leak",
        "Check coolant level, hoses, radiator cap. Stop driving if overheating.",
    ),
    (
        "Unbalanced wheels",
        "Get wheel balancing and alignment at a workshop.",
    ),
    (
        "Alternator issue",
        "Check charging system. Look for battery warning light.",
    ),
    (
        "Fuel pump problem",
        "Check fuel pressure. Avoid running with low fuel.",
    ),
    (
        "Engine overheating",
        "Check coolant, radiator fan, thermostat.",
    ),
    (
        "Gearbox issue",
        "Check transmission oil level. Drive gently and visit workshop.",
    ),
    (
        "Suspension issue",
        "Drive slowly over bumps. Inspect shock absorbers.",
    ),
];

/// Label -> remediation text, with a fallback for unmapped labels.
#[derive(Debug, Clone)]
pub struct SuggestionTable {
    entries: HashMap<String, String>,
    fallback: String,
}

impl Default for SuggestionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SuggestionTable {
    /// The ten stock fault categories.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|(label, text)| (label.to_string(), text.to_string())),
        )
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
            fallback: DEFAULT_SUGGESTION.to_string(),
        }
    }

    /// Reads a flat JSON object of `label -> text`.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let entries: HashMap<String, String> = read_json(path)?;
        info!(path = %path.display(), entries = entries.len(), "Suggestion table loaded");
        Ok(Self::from_entries(entries))
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Remediation text for `label`, or the fallback.
    pub fn lookup(&self, label: &str) -> &str {
        self.entries
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Append-only JSON-lines log of user feedback on predictions.
//!
//! One record per line. The reported count is the file's line count. Appends from
//! this process are serialised; nothing coordinates with other processes writing
//! the same file.

pub mod error;


pub use error::{FeedbackError, FeedbackResult};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Maximum accepted comment length, in characters.
pub const MAX_COMMENT_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A user's verdict on one prediction.
pub struct FeedbackRecord {
    pub timestamp: DateTime<Utc>,
    /// The complaint text as submitted.
    pub input: String,
    pub predicted_label: String,
    /// Whether the user says the prediction was right.
    pub correct: bool,
    #[serde(default)]
    pub comment: String,
}

impl FeedbackRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        input: impl Into<String>,
        predicted_label: impl Into<String>,
        correct: bool,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            input: input.into(),
            predicted_label: predicted_label.into(),
            correct,
            comment: comment.into(),
        }
    }

    /// Rejects records without a label or with an oversized comment.
    pub fn validate(&self) -> FeedbackResult<()> {
        if self.predicted_label.trim().is_empty() {
            return Err(FeedbackError::Invalid {
                reason: "predicted_label is empty".to_string(),
            });
        }
        if self.comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(FeedbackError::Invalid {
                reason: format!("comment exceeds {} characters", MAX_COMMENT_CHARS),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
/// JSON-lines feedback file.
pub struct FeedbackLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record` and returns the resulting line count.
    pub fn append(&self, record: &FeedbackRecord) -> FeedbackResult<usize> {
        record.validate()?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(line.as_bytes())
            .map_err(|source| self.io_error(source))?;
        file.flush().map_err(|source| self.io_error(source))?;

        let total = self.count_unlocked()?;
        info!(
            label = %record.predicted_label,
            correct = record.correct,
            total,
            "Feedback recorded"
        );
        Ok(total)
    }

    /// Number of lines in the log (`0` if the file does not exist yet).
    pub fn count(&self) -> FeedbackResult<usize> {
        let _guard = self.write_lock.lock();
        self.count_unlocked()
    }

    /// Parses every non-empty line.
    pub fn read_all(&self) -> FeedbackResult<Vec<FeedbackRecord>> {
        let Some(content) = self.read_to_string()? else {
            return Ok(Vec::new());
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| FeedbackError::Corrupt {
                    line: i + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    fn count_unlocked(&self) -> FeedbackResult<usize> {
        let count = self
            .read_to_string()?
            .map(|content| content.lines().count())
            .unwrap_or(0);
        debug!(path = %self.path.display(), count, "Counted feedback lines");
        Ok(count)
    }

    fn read_to_string(&self) -> FeedbackResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> FeedbackError {
        FeedbackError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

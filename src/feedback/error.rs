use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned by the feedback log.
pub enum FeedbackError {
    /// IO error.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored line is not a valid record.
    #[error("corrupt feedback record at line {line}: {reason}")]
    Corrupt {
        /// 1-based line number.
        line: usize,
        reason: String,
    },

    /// Submitted feedback is missing required fields.
    #[error("invalid feedback: {reason}")]
    Invalid { reason: String },
}

/// Convenience result type for feedback operations.
pub type FeedbackResult<T> = Result<T, FeedbackError>;

// WHY: one error type for every library entry point; the CLI wraps it in anyhow

use thiserror::Error;

/// Result type for annotation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while scanning, aggregating or configuring finders.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A classifier reported a match whose bytes do not appear in the field it was given.
    /// This is a bug in the classifier, not in the input text.
    #[error("classifier returned unmatched substring '{}'", String::from_utf8_lossy(.0))]
    UnmatchedSubstring(Vec<u8>),

    /// A scan task panicked or was cancelled before reporting.
    #[error("scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// `short_url` needs room for at least one byte plus the ellipsis.
    #[error("maximum length must be at least 4, got {0}")]
    InvalidMaxLength(usize),

    /// Classifier configuration could not be parsed.
    #[error("invalid classifier config: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Bytes carried by a classifier contract violation.
    pub fn unmatched_bytes(&self) -> Option<&[u8]> {
        match self {
            Error::UnmatchedSubstring(bytes) => Some(bytes),
            _ => None,
        }
    }
}

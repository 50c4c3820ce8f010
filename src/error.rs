//! Error type shared by the table, reduction, and I/O layers.

use std::io;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, BookmergeError>;

/// Failures surfaced by `bookmerge-core`.
///
/// Recoverable anomalies in input data (malformed raw records, mismatched merge
/// lengths) are not represented here; they are logged and counted instead.
#[derive(Debug, Error)]
pub enum BookmergeError {
    #[error("address {url} already exists; use replace to overwrite it")]
    DuplicateKey { url: String },

    #[error("unknown attribute field name '{name}'")]
    UnknownField { name: String },

    #[error("unknown attribute field index {index}")]
    UnknownFieldIndex { index: i64 },

    #[error("age value '{value}' is not an integer timestamp")]
    InvalidAge { value: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("search needs one field per pattern (got {patterns} patterns, {fields} fields)")]
    SearchArity { patterns: usize, fields: usize },

    #[error("invalid address table snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("invalid raw record batch: {reason}")]
    InvalidBatch { reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl BookmergeError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }
}

//! # Economy Error Types
//!
//! Errors raised by drop-table loading and statistics stores.
//! Reward computation itself never fails.

use thiserror::Error;

/// Errors that can occur in the economy system.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("io error on {path}: {source}")]
    Io {
        /// File or directory involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A TOML document could not be parsed.
    #[error("failed to parse {what}: {source}")]
    Decode {
        /// What was being parsed.
        what: String,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// A value could not be encoded as TOML.
    #[error("failed to encode statistics: {0}")]
    Encode(#[from] toml::ser::Error),

    /// SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Invalid configuration for a store or table.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().display().to_string(), source }
    }
}

/// Result type for economy operations.
pub type StoreResult<T> = Result<T, StoreError>;

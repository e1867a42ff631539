//! Error types for the persistence store

use std::path::PathBuf;

/// Errors raised by store backends and the typed collection layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error from the file backend
    #[error("io error on {path}: {source}")]
    Io {
        /// File the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A stored blob was not the JSON array the collection expects
    #[error("collection under '{key}' is not a JSON array: {detail}")]
    Malformed {
        /// Collection key whose blob failed to parse
        key: String,
        /// Parser detail
        detail: String,
    },

    /// A collection could not be serialized for writing
    #[error("failed to serialize collection under '{key}': {source}")]
    Serialize {
        /// Collection key being written
        key: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create an IO error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Cart store error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during cart store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing cache could not be reached or the command failed.
    #[error("cache backend error: {0}")]
    Backend(#[from] ::redis::RedisError),

    /// The backing cache did not answer within the configured bound.
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// A stored document failed validation on read. Corrupt documents
    /// are rejected, never trusted or silently dropped.
    #[error("corrupt cart document under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A cart document could not be serialized for writing.
    #[error("failed to serialize cart document for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for cart store results.
pub type Result<T> = std::result::Result<T, StoreError>;

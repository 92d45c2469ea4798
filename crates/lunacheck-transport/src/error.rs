//! Transport error types

use std::time::Duration;
use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur in transport operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call binary could not be spawned
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        /// The binary that failed to start
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// I/O error on a child process pipe
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The call process exited unsuccessfully
    #[error("call process exited with {0}")]
    ProcessFailed(String),

    /// The call process produced no response line
    #[error("empty response from call process")]
    EmptyResponse,

    /// A response line was not valid JSON
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The service refused the subscription on its first response
    #[error("subscription rejected: {0}")]
    SubscriptionRejected(String),

    /// The call did not complete within the configured timeout
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
}

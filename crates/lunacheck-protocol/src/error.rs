//! Error types for protocol operations

use thiserror::Error;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur while building or interpreting wire payloads
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response that is not a JSON object where one is required
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A field the caller relies on is absent from the payload
    #[error("Missing required field: {0}")]
    MissingField(String),
}

//! Harness error types
//!
//! Assertion failures carry the offending payload so a conformance report
//! can show what the service actually said, not just that it was wrong.

use lunacheck_protocol::Mismatch;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors raised by fixtures, checks, and the runner
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Transport failure underneath a check
    #[error("transport error: {0}")]
    Transport(#[from] lunacheck_transport::TransportError),

    /// Payload construction failed
    #[error("protocol error: {0}")]
    Protocol(#[from] lunacheck_protocol::ProtocolError),

    /// A call expected to succeed reported failure
    #[error("call to {method} reported failure: {response}")]
    CallFailed {
        /// Method that was called
        method: String,
        /// The failure payload
        response: Value,
    },

    /// A call expected to fail reported success
    #[error("call to {method} unexpectedly succeeded: {response}")]
    CallSucceeded {
        /// Method that was called
        method: String,
        /// The success payload
        response: Value,
    },

    /// No subscription event arrived where one was required
    #[error("no subscription update after {method} within {timeout:?}")]
    MissingUpdate {
        /// Method that should have provoked the event
        method: String,
        /// How long the waiter held on
        timeout: Duration,
    },

    /// A subscription event arrived where none was allowed
    #[error("unexpected subscription update after {method}: {update}")]
    UnexpectedUpdate {
        /// Method that should have been rejected silently
        method: String,
        /// The event that arrived anyway
        update: Value,
    },

    /// The subscription event does not satisfy the expectation
    #[error("update after {method} does not match ({mismatch}): {update}")]
    UpdateMismatch {
        /// Method that provoked the event
        method: String,
        /// Where the pattern failed
        mismatch: Mismatch,
        /// The full event payload
        update: Value,
    },

    /// A failing call used a different error code than the one specified
    #[error("call to {method} failed with errorCode {got:?}, expected {expected}: {response}")]
    WrongErrorCode {
        /// Method that was called
        method: String,
        /// Error code the service documents for this failure
        expected: i64,
        /// Error code actually returned, if any
        got: Option<i64>,
        /// The full failure payload
        response: Value,
    },

    /// Suite configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// The scenario does not apply under the current configuration
    #[error("skipped: {0}")]
    Skipped(String),
}

impl HarnessError {
    /// Skip marker for scenarios gated off by configuration
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }
}

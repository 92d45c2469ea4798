//! Views over call responses
//!
//! Every luna response is a JSON object carrying at least `returnValue`.
//! Failures add `errorCode` and `errorText`. [`CallReturn`] is a borrowing
//! view so raw payloads can still be matched with [`crate::Pattern`].

use serde_json::Value;

/// Error codes the service responds with
///
/// Taken from the service's published error table; the suite asserts on
/// these in negative scenarios.
pub mod error_codes {
    /// Unknown error
    pub const UNKNOWN: i64 = 1;
    /// Request failed schema validation
    pub const SCHEMA_VALIDATION: i64 = 3;
    /// A parameter was syntactically valid but unusable
    pub const INVALID_PARAMETERS: i64 = 4;
    /// Call not valid in the current state
    pub const INVALID_STATUS: i64 = 5;
    /// Method not implemented
    pub const NOT_IMPLEMENTED: i64 = 10;
    /// Driver error while executing the command
    pub const DRIVER: i64 = 20;
    /// Video not connected
    pub const VIDEO_NOT_CONNECTED: i64 = 100;
    /// Requested window below the downscale limit
    pub const DOWNSCALE_LIMIT: i64 = 102;
    /// Requested window above the upscale limit
    pub const UPSCALE_LIMIT: i64 = 103;
}

/// Borrowing view over a call response payload
#[derive(Debug, Clone, Copy)]
pub struct CallReturn<'a> {
    value: &'a Value,
}

impl<'a> CallReturn<'a> {
    /// View the given payload as a call response
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// The raw payload
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// `returnValue`, false when absent or not a boolean
    pub fn is_success(&self) -> bool {
        self.value
            .get("returnValue")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// `errorCode`, present on failures
    pub fn error_code(&self) -> Option<i64> {
        self.value.get("errorCode").and_then(Value::as_i64)
    }

    /// `errorText`, present on failures
    pub fn error_text(&self) -> Option<&'a str> {
        self.value.get("errorText").and_then(Value::as_str)
    }

    /// `subscribed`, echoed by subscribable methods
    pub fn subscribed(&self) -> Option<bool> {
        self.value.get("subscribed").and_then(Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let payload = json!({"returnValue": true, "planeID": 1});
        let ret = CallReturn::new(&payload);
        assert!(ret.is_success());
        assert_eq!(ret.error_code(), None);
    }

    #[test]
    fn test_failure_response() {
        let payload = json!({
            "returnValue": false,
            "errorCode": 100,
            "errorText": "Video not connected",
        });
        let ret = CallReturn::new(&payload);
        assert!(!ret.is_success());
        assert_eq!(ret.error_code(), Some(error_codes::VIDEO_NOT_CONNECTED));
        assert_eq!(ret.error_text(), Some("Video not connected"));
    }

    #[test]
    fn test_missing_return_value_is_failure() {
        let payload = json!({"subscribed": true});
        assert!(!CallReturn::new(&payload).is_success());
    }
}

//! Configuration for the `luna-send` transport

use std::time::Duration;

/// Configuration for spawning `luna-send` processes
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Path to the `luna-send` executable
    pub send_path: String,

    /// Bus URI prefix the method name is appended to
    pub service_uri: String,

    /// How long a one-shot call may take before its process is killed
    pub call_timeout: Duration,

    /// Default wait for a subscription event
    pub await_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            send_path: "luna-send".to_string(),
            service_uri: lunacheck_protocol::methods::SERVICE_URI.to_string(),
            call_timeout: Duration::from_secs(5),
            await_timeout: Duration::from_secs(1),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with a custom `luna-send` path
    pub fn new(send_path: impl Into<String>) -> Self {
        Self {
            send_path: send_path.into(),
            ..Default::default()
        }
    }

    /// Set the service URI prefix
    pub fn with_service_uri(mut self, uri: impl Into<String>) -> Self {
        self.service_uri = uri.into();
        self
    }

    /// Set the one-shot call timeout
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the default subscription await timeout
    pub fn with_await_timeout(mut self, timeout: Duration) -> Self {
        self.await_timeout = timeout;
        self
    }
}

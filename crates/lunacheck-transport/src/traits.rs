//! The bus seam
//!
//! Scenarios and fixtures speak to the service through [`ServiceBus`], so the
//! same scripts run against the real `luna-send` transport and against the
//! in-process mock the harness tests itself with.

use crate::error::Result;
use crate::subscription::Subscription;
use async_trait::async_trait;
use serde_json::Value;

/// A request/response + subscription connection to the service under test
#[async_trait]
pub trait ServiceBus: Send + Sync {
    /// Issue a one-shot call and return the parsed response payload
    ///
    /// The response is returned whether the service reports success or
    /// failure; callers assert on `returnValue` themselves.
    async fn call(&self, method: &str, params: Value) -> Result<Value>;

    /// Open a long-lived subscription to `method`
    ///
    /// Implementations force `"subscribe": true` into the parameters and
    /// fail if the service rejects the subscription on its first response.
    async fn subscribe(&self, method: &str, params: Value) -> Result<Subscription>;
}

//! Call-then-await-subscription synchronization
//!
//! The conformance pattern used throughout the suite: issue a control call
//! and, while it is in flight, wait on the status subscription for the event
//! the call should provoke. The two halves run concurrently; the update
//! window opens when the call is issued, not when it completes, so an event
//! posted by the service before the call response makes it back is not lost.

use crate::error::Result;
use crate::subscription::Subscription;
use crate::traits::ServiceBus;
use serde_json::Value;
use std::time::Duration;

/// Issue `method` and concurrently wait for the next subscription event
///
/// Returns the call response paired with the event, or `None` in place of
/// the event if nothing arrived within `timeout`. Assumes the single-waiter
/// subscription contract; the caller is the one consumer.
pub async fn call_and_await_update(
    bus: &dyn ServiceBus,
    method: &str,
    params: Value,
    subscription: &Subscription,
    timeout: Duration,
) -> Result<(Value, Option<Value>)> {
    let (response, update) = tokio::join!(
        bus.call(method, params),
        subscription.await_update_timeout(timeout),
    );
    Ok((response?, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::mpsc;

    /// Bus that answers every call and echoes a status event per call
    struct EchoBus {
        events: mpsc::UnboundedSender<Value>,
        delay: Duration,
    }

    #[async_trait]
    impl ServiceBus for EchoBus {
        async fn call(&self, method: &str, _params: Value) -> Result<Value> {
            tokio::time::sleep(self.delay).await;
            self.events
                .send(json!({"video": [], "method": method}))
                .map_err(|e| TransportError::ProcessFailed(e.to_string()))?;
            Ok(json!({"returnValue": true}))
        }

        async fn subscribe(&self, _method: &str, _params: Value) -> Result<Subscription> {
            unimplemented!("tests construct subscriptions directly")
        }
    }

    #[tokio::test]
    async fn test_call_result_and_update_are_paired() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub = Subscription::from_stream(json!({"returnValue": true}), rx, Duration::from_secs(1));
        let bus = EchoBus {
            events: tx,
            delay: Duration::from_millis(10),
        };

        let (response, update) = call_and_await_update(
            &bus,
            "blankVideo",
            json!({"sink": "MAIN", "blank": true}),
            &sub,
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        assert_eq!(response["returnValue"], json!(true));
        assert_eq!(update.unwrap()["method"], json!("blankVideo"));
    }

    #[tokio::test]
    async fn test_no_update_yields_none() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub =
            Subscription::from_stream(json!({"returnValue": true}), rx, Duration::from_secs(1));
        // A bus that answers but never posts an event.
        struct SilentBus;
        #[async_trait]
        impl ServiceBus for SilentBus {
            async fn call(&self, _method: &str, _params: Value) -> Result<Value> {
                Ok(json!({"returnValue": false, "errorCode": 4}))
            }
            async fn subscribe(&self, _m: &str, _p: Value) -> Result<Subscription> {
                unimplemented!()
            }
        }

        let (response, update) = call_and_await_update(
            &SilentBus,
            "connect",
            json!({}),
            &sub,
            Duration::from_millis(50),
        )
        .await
        .unwrap();

        assert_eq!(response["returnValue"], json!(false));
        assert!(update.is_none());
        drop(tx);
    }
}

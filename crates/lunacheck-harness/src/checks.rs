//! Call-and-subscription assertions
//!
//! The four checks every scenario is written in terms of, ported from the
//! original suite's assertion base: success, failure, success plus a
//! matching status event, and failure plus confirmed silence.

use crate::error::{HarnessError, Result};
use crate::scenario::ScenarioContext;
use lunacheck_protocol::{CallReturn, Pattern};
use lunacheck_transport::call_and_await_update;
use serde_json::Value;
use tracing::debug;

impl ScenarioContext {
    /// Issue a call without asserting on the outcome
    ///
    /// For set-up steps where a failure is acceptable, e.g. disconnecting a
    /// sink that may not be connected.
    pub async fn call_unchecked(&self, method: &str, params: Value) -> Result<Value> {
        Ok(self.bus.call(method, params).await?)
    }

    /// Call must report `returnValue: true`
    pub async fn check_call_success(&self, method: &str, params: Value) -> Result<Value> {
        let response = self.bus.call(method, params).await?;
        if !CallReturn::new(&response).is_success() {
            return Err(HarnessError::CallFailed {
                method: method.to_string(),
                response,
            });
        }
        Ok(response)
    }

    /// Call must report `returnValue: false`
    pub async fn check_call_fail(&self, method: &str, params: Value) -> Result<Value> {
        let response = self.bus.call(method, params).await?;
        if CallReturn::new(&response).is_success() {
            return Err(HarnessError::CallSucceeded {
                method: method.to_string(),
                response,
            });
        }
        Ok(response)
    }

    /// Call must succeed and the status subscription must deliver an event
    /// matching `expected` within the update timeout
    pub async fn check_call_success_with_update(
        &self,
        method: &str,
        params: Value,
        expected: impl Into<Pattern>,
    ) -> Result<(Value, Value)> {
        let expected = expected.into();
        let timeout = self.config.update_timeout();
        let (response, update) =
            call_and_await_update(self.bus.as_ref(), method, params, self.status(), timeout)
                .await?;

        if !CallReturn::new(&response).is_success() {
            return Err(HarnessError::CallFailed {
                method: method.to_string(),
                response,
            });
        }

        let update = update.ok_or_else(|| HarnessError::MissingUpdate {
            method: method.to_string(),
            timeout,
        })?;

        if let Some(mismatch) = expected.mismatch(&update) {
            return Err(HarnessError::UpdateMismatch {
                method: method.to_string(),
                mismatch,
                update,
            });
        }

        debug!(%method, "call succeeded and update matched");
        Ok((response, update))
    }

    /// Call must fail and the subscription must stay silent for the
    /// negative window
    pub async fn check_call_fail_no_update(&self, method: &str, params: Value) -> Result<Value> {
        let window = self.config.negative_window();
        let (response, update) =
            call_and_await_update(self.bus.as_ref(), method, params, self.status(), window)
                .await?;

        if CallReturn::new(&response).is_success() {
            return Err(HarnessError::CallSucceeded {
                method: method.to_string(),
                response,
            });
        }

        if let Some(update) = update {
            return Err(HarnessError::UnexpectedUpdate {
                method: method.to_string(),
                update,
            });
        }

        Ok(response)
    }
}

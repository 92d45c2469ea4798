//! Per-scenario fixture
//!
//! Every scenario runs between a set-up and a tear-down that leave the
//! service in a known state: all configured sinks disconnected and one
//! status subscription live for the scenario's assertions. Set-up
//! disconnects defensively and ignores the result; a clean service answers
//! those calls with "not connected" and that is fine.

use crate::config::SuiteConfig;
use crate::error::Result;
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{DisconnectRequest, RegisterRequest, ToParams};
use lunacheck_transport::{ServiceBus, Subscription};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// A live fixture: clean sinks plus one `getStatus` subscription
pub struct Fixture {
    bus: Arc<dyn ServiceBus>,
    config: SuiteConfig,
    status: Subscription,
}

impl Fixture {
    /// Disconnect the configured sinks, register contexts when enabled,
    /// and open the status subscription
    pub async fn set_up(bus: Arc<dyn ServiceBus>, config: SuiteConfig) -> Result<Self> {
        debug!("fixture set_up");
        for sink in &config.sinks {
            // Stale connections from an earlier run are expected; failures
            // here mean "nothing to disconnect".
            let mut request = DisconnectRequest::new(*sink);
            if let Some(context) = config.call_context() {
                request = request.with_context(context);
            }
            let params = request.to_params()?;
            if let Err(error) = bus.call(methods::DISCONNECT, params).await {
                warn!(%sink, %error, "pre-test disconnect failed");
            }
        }

        if config.support_register {
            for context in &config.contexts {
                debug!(%context, "registering context");
                let params = RegisterRequest::new(context).to_params()?;
                if let Err(error) = bus.call(methods::REGISTER, params).await {
                    warn!(%context, %error, "register failed");
                }
            }
        }

        let status = bus.subscribe(methods::GET_STATUS, json!({})).await?;
        Ok(Self {
            bus,
            config,
            status,
        })
    }

    /// The status subscription the scenario waits on
    pub fn status(&self) -> &Subscription {
        &self.status
    }

    /// The bus this fixture drives
    pub fn bus(&self) -> &dyn ServiceBus {
        self.bus.as_ref()
    }

    /// Disconnect sinks, unregister contexts, cancel the subscription
    ///
    /// Runs after every scenario, pass or fail. Individual clean-up
    /// failures are logged, not propagated; tear-down must not mask the
    /// scenario's own verdict.
    pub async fn tear_down(self) {
        debug!("fixture tear_down");
        for sink in &self.config.sinks {
            let mut request = DisconnectRequest::new(*sink);
            if let Some(context) = self.config.call_context() {
                request = request.with_context(context);
            }
            match request.to_params() {
                Ok(params) => {
                    if let Err(error) = self.bus.call(methods::DISCONNECT, params).await {
                        warn!(%sink, %error, "tear-down disconnect failed");
                    }
                }
                Err(error) => warn!(%sink, %error, "tear-down disconnect params"),
            }
        }

        if self.config.support_register {
            for context in &self.config.contexts {
                match RegisterRequest::new(context).to_params() {
                    Ok(params) => {
                        if let Err(error) = self.bus.call(methods::UNREGISTER, params).await {
                            warn!(%context, %error, "unregister failed");
                        }
                    }
                    Err(error) => warn!(%context, %error, "unregister params"),
                }
            }
        }

        self.status.cancel().await;
    }
}

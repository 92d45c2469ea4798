//! The process-backed [`ServiceBus`] implementation
//!
//! One-shot calls run `luna-send -n 1 <uri> <json>` to completion;
//! subscriptions keep `luna-send -i <uri> <json>` alive and stream its
//! stdout. Stderr is discarded in both cases, matching how the service's
//! own tooling invokes the CLI.

use crate::error::{Result, TransportError};
use crate::subprocess::config::ClientConfig;
use crate::subscription::Subscription;
use crate::traits::ServiceBus;
use async_trait::async_trait;
use lunacheck_protocol::CallReturn;
use serde_json::Value;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, trace};

/// `ServiceBus` implementation that shells out to `luna-send`
#[derive(Debug, Clone)]
pub struct LunaSendBus {
    config: ClientConfig,
}

impl LunaSendBus {
    /// Create a bus from the given configuration
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// The configuration this bus was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn method_uri(&self, method: &str) -> String {
        format!("{}{}", self.config.service_uri, method)
    }
}

#[async_trait]
impl ServiceBus for LunaSendBus {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let uri = self.method_uri(method);
        let payload = serde_json::to_string(&params)?;
        debug!(%method, "one-shot call");
        trace!(%payload, "call payload");

        let child = Command::new(&self.config.send_path)
            .arg("-n")
            .arg("1")
            .arg(&uri)
            .arg(&payload)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                command: self.config.send_path.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.config.call_timeout, child.wait_with_output())
            .await
            .map_err(|_| TransportError::Timeout(self.config.call_timeout))??;

        if !output.status.success() {
            return Err(TransportError::ProcessFailed(output.status.to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or(TransportError::EmptyResponse)?;
        trace!(response = %line, "call response");
        Ok(serde_json::from_str(line)?)
    }

    async fn subscribe(&self, method: &str, params: Value) -> Result<Subscription> {
        let uri = self.method_uri(method);
        let mut params = params;
        if let Some(object) = params.as_object_mut() {
            object.insert("subscribe".to_string(), Value::Bool(true));
        }
        let payload = serde_json::to_string(&params)?;
        debug!(%method, "subscribing");

        let mut child = Command::new(&self.config.send_path)
            .arg("-i")
            .arg(&uri)
            .arg(&payload)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                command: self.config.send_path.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            TransportError::ProcessFailed("subscription process has no stdout".to_string())
        })?;
        let mut lines = BufReader::new(stdout).lines();

        let first_line = tokio::time::timeout(self.config.call_timeout, lines.next_line())
            .await
            .map_err(|_| TransportError::Timeout(self.config.call_timeout))??
            .ok_or(TransportError::EmptyResponse)?;
        let first_response: Value = serde_json::from_str(first_line.trim())?;

        if !CallReturn::new(&first_response).is_success() {
            let _ = child.kill().await;
            return Err(TransportError::SubscriptionRejected(
                first_response.to_string(),
            ));
        }

        debug!(%method, "subscription established");
        Ok(Subscription::from_process(
            first_response,
            lines,
            child,
            self.config.await_timeout,
        ))
    }
}

//! Long-lived subscription handles
//!
//! A subscription owns one `luna-send -i` process (or, in tests, an
//! in-process event stream) and a one-slot last-event-wins buffer. The
//! contract is single-consumer: one waiter at a time takes events out of the
//! slot. An event that arrives before the waiter registers is still
//! delivered; any event before that one is discarded.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, Lines};
use tokio::process::Child;
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One-slot event buffer shared between the reader task and the waiter
#[derive(Default)]
pub(crate) struct UpdateSlot {
    latest: Mutex<Option<Value>>,
    notify: Notify,
}

impl UpdateSlot {
    pub(crate) async fn publish(&self, update: Value) {
        *self.latest.lock().await = Some(update);
        self.notify.notify_one();
    }

    async fn take(&self) -> Option<Value> {
        self.latest.lock().await.take()
    }
}

/// Handle to a live subscription
///
/// Dropping the handle kills the backing process on a best-effort basis;
/// call [`Subscription::cancel`] for a deterministic shutdown.
pub struct Subscription {
    first_response: Value,
    slot: Arc<UpdateSlot>,
    reader: Option<JoinHandle<()>>,
    child: Option<Arc<Mutex<Child>>>,
    await_timeout: Duration,
}

impl Subscription {
    pub(crate) fn from_process<R>(
        first_response: Value,
        lines: Lines<R>,
        child: Child,
        await_timeout: Duration,
    ) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let slot = Arc::new(UpdateSlot::default());
        let reader = tokio::spawn(read_events(lines, Arc::clone(&slot)));
        Self {
            first_response,
            slot,
            reader: Some(reader),
            child: Some(Arc::new(Mutex::new(child))),
            await_timeout,
        }
    }

    /// Subscription fed from an in-process channel instead of a child process
    ///
    /// Used by mock buses; the channel closing ends the stream the same way
    /// process EOF does.
    pub fn from_stream(
        first_response: Value,
        mut events: mpsc::UnboundedReceiver<Value>,
        await_timeout: Duration,
    ) -> Self {
        let slot = Arc::new(UpdateSlot::default());
        let feeder = {
            let slot = Arc::clone(&slot);
            tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    slot.publish(event).await;
                }
                debug!("subscription stream closed");
            })
        };
        Self {
            first_response,
            slot,
            reader: Some(feeder),
            child: None,
            await_timeout,
        }
    }

    /// The initial response the service sent when the subscription was made
    pub fn first_response(&self) -> &Value {
        &self.first_response
    }

    /// Wait for the next event using the configured default timeout
    pub async fn await_update(&self) -> Option<Value> {
        self.await_update_timeout(self.await_timeout).await
    }

    /// Wait for the next event, up to `timeout`
    ///
    /// Returns the buffered event immediately if one is already pending,
    /// `None` if nothing arrives in time.
    pub async fn await_update_timeout(&self, timeout: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(update) = self.slot.take().await {
                return Some(update);
            }
            if tokio::time::timeout_at(deadline, self.slot.notify.notified())
                .await
                .is_err()
            {
                // One last look: a publish may have raced the deadline.
                return self.slot.take().await;
            }
        }
    }

    /// Kill the subscription process and stop the reader task
    pub async fn cancel(mut self) {
        if let Some(child) = self.child.take() {
            let mut child = child.lock().await;
            // Already-exited children are fine.
            if let Err(error) = child.kill().await {
                debug!(%error, "subscription process already gone");
            }
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
            let _ = reader.await;
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("first_response", &self.first_response)
            .field("await_timeout", &self.await_timeout)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        // The child, if any, was spawned with kill_on_drop.
    }
}

async fn read_events<R>(mut lines: Lines<R>, slot: Arc<UpdateSlot>)
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Value>(line) {
                    Ok(event) => slot.publish(event).await,
                    Err(error) => warn!(%error, "skipping unparseable subscription line"),
                }
            }
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "subscription pipe read failed");
                break;
            }
        }
    }
    debug!("subscription reader finished");
}

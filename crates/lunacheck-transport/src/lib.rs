//! Process-level transport to the videooutput service
//!
//! The service is reachable only over the luna bus, and this suite talks to
//! the bus the way the original tooling does: by spawning the external
//! `luna-send` CLI. Two shapes of traffic exist and each gets a primitive:
//!
//! - **One-shot calls**: spawn `luna-send -n 1`, wait for exit, parse the
//!   single JSON line it prints.
//! - **Subscriptions**: spawn `luna-send -i`, keep it alive, read
//!   newline-delimited JSON events on a background task, expose the latest
//!   event to a single waiter, cancel by killing the process.
//!
//! [`call_and_await_update`] ties the two together: issue a call while
//! concurrently waiting for the status event it should provoke.
//!
//! There is deliberately no retry, no backoff, and no reconnect logic here;
//! a conformance run that loses its bus should fail loudly.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod subprocess;
pub mod subscription;
pub mod sync;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use subprocess::{ClientConfig, LunaSendBus};
pub use subscription::Subscription;
pub use sync::call_and_await_update;
pub use traits::ServiceBus;

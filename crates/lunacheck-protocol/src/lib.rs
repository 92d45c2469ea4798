//! Wire types for the `com.webos.service.videooutput` luna API
//!
//! This crate holds the pure-data half of the conformance suite: the method
//! names the service registers, serde payload builders for every control call
//! the scenarios issue, the response and status shapes the service emits, and
//! the structural [`Pattern`] matcher the assertions are written against.
//!
//! # Design Principles
//!
//! - **Zero I/O**: All types are pure data structures
//! - **Serialization**: serde-based, matching the service's camelCase wire JSON
//! - **Idiomatic Rust**: Owned types, `Result<T>` for errors, `Option<T>` for optional values

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod methods;
pub mod pattern;
pub mod request;
pub mod response;
pub mod status;
pub mod types;

// Re-export commonly used types at crate level
pub use error::{ProtocolError, Result};
pub use pattern::{Mismatch, Pattern};
pub use request::{
    BlankVideoRequest, ComposeOrder, CompositingRequest, ConnectRequest, DisconnectRequest,
    DisplayWindowRequest, GetStatusRequest, RegisterRequest, VideoDataRequest,
};
pub use response::{CallReturn, error_codes};
pub use status::{SinkStatus, StatusPayload};
pub use types::{OutputMode, ScanType, Sink, Source, VideoRect};

//! Conformance scenarios for the videooutput service
//!
//! Each scenario scripts a sequence of control calls against a live service
//! and asserts on the call results and on the status subscription events
//! they provoke. Scenarios are registered in [`scenarios::register_all`] and
//! executed by the `lunacheck` binary or, against the in-process mock, by
//! the integration tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod scenarios;

pub use scenarios::register_all;

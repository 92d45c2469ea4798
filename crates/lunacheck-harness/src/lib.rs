//! Conformance harness for the videooutput service
//!
//! Glue between the transport and the scenario scripts: a per-scenario
//! [`Fixture`] (clean sinks plus one status subscription), the four
//! call-and-subscription checks the suite is written in, a [`Scenario`]
//! registry, and a [`Runner`] that executes scenarios with guaranteed
//! tear-down and collects a report.
//!
//! The [`testing`] module provides [`testing::MockBus`], an in-process
//! stand-in for the service so the harness and the scenario scripts can be
//! exercised without a luna bus.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod checks;
pub mod config;
pub mod error;
pub mod fixture;
pub mod runner;
pub mod scenario;
pub mod testing;

// Re-export commonly used types
pub use config::SuiteConfig;
pub use error::{HarnessError, Result};
pub use fixture::Fixture;
pub use runner::{Outcome, Runner, ScenarioReport, SuiteReport};
pub use scenario::{Registry, Scenario, ScenarioContext};

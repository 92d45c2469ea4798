//! Scenario execution and reporting
//!
//! Runs each scenario inside a fresh fixture, always tearing down, and
//! collects a report the CLI renders and derives its exit code from.

use crate::config::SuiteConfig;
use crate::error::HarnessError;
use crate::fixture::Fixture;
use crate::scenario::{Scenario, ScenarioContext};
use lunacheck_transport::ServiceBus;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How a scenario ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every check held
    Passed,
    /// A check failed or the fixture broke
    Failed(String),
    /// Not applicable under the current configuration
    Skipped(String),
}

/// Result of a single scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// How it ended
    pub outcome: Outcome,
    /// Wall-clock time including fixture set-up and tear-down
    pub duration: Duration,
}

/// Results of a whole run
#[derive(Debug, Default)]
pub struct SuiteReport {
    /// Per-scenario results, run order
    pub reports: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Count of passed scenarios
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    /// Count of failed scenarios
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// Count of skipped scenarios
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// Whether the run is clean (failures only; skips don't count against)
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, matcher: impl Fn(&Outcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| matcher(&report.outcome))
            .count()
    }

    /// Human-readable summary table
    pub fn render(&self) -> String {
        let mut out = String::new();
        for report in &self.reports {
            let (tag, detail) = match &report.outcome {
                Outcome::Passed => ("PASS", String::new()),
                Outcome::Failed(reason) => ("FAIL", format!("  {}", reason)),
                Outcome::Skipped(reason) => ("SKIP", format!("  {}", reason)),
            };
            let _ = writeln!(
                out,
                "{:4}  {:<32} {:>7.2}s{}",
                tag,
                report.name,
                report.duration.as_secs_f64(),
                detail
            );
        }
        let _ = writeln!(
            out,
            "\n{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        );
        out
    }
}

/// Drives scenarios against a bus
pub struct Runner {
    bus: Arc<dyn ServiceBus>,
    config: SuiteConfig,
}

impl Runner {
    /// Runner over `bus` with the given configuration
    pub fn new(bus: Arc<dyn ServiceBus>, config: SuiteConfig) -> Self {
        Self { bus, config }
    }

    /// Run the given scenarios in order
    pub async fn run(&self, scenarios: &[Arc<dyn Scenario>]) -> SuiteReport {
        let mut suite = SuiteReport::default();
        for scenario in scenarios {
            info!("[{}]", scenario.name());
            let started = Instant::now();
            let outcome = match self.run_one(scenario.as_ref()).await {
                Ok(()) => Outcome::Passed,
                Err(HarnessError::Skipped(reason)) => {
                    warn!(scenario = scenario.name(), %reason, "skipped");
                    Outcome::Skipped(reason)
                }
                Err(err) => {
                    error!(scenario = scenario.name(), %err, "failed");
                    Outcome::Failed(err.to_string())
                }
            };
            suite.reports.push(ScenarioReport {
                name: scenario.name().to_string(),
                outcome,
                duration: started.elapsed(),
            });
        }
        suite
    }

    async fn run_one(&self, scenario: &dyn Scenario) -> crate::error::Result<()> {
        let fixture = Fixture::set_up(Arc::clone(&self.bus), self.config.clone()).await?;
        let ctx = ScenarioContext::new(Arc::clone(&self.bus), fixture, self.config.clone());
        let verdict = scenario.run(&ctx).await;
        // Tear down whatever happened; the scenario's verdict wins.
        ctx.into_fixture().tear_down().await;
        verdict
    }
}

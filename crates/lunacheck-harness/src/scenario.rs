//! Scenario abstraction and registry

use crate::config::SuiteConfig;
use crate::error::Result;
use crate::fixture::Fixture;
use async_trait::async_trait;
use lunacheck_transport::{ServiceBus, Subscription};
use std::sync::Arc;
use tracing::info;

/// Everything a scenario needs while it runs
pub struct ScenarioContext {
    pub(crate) bus: Arc<dyn ServiceBus>,
    pub(crate) fixture: Fixture,
    pub(crate) config: SuiteConfig,
}

impl ScenarioContext {
    /// Build a context around a live fixture
    pub fn new(bus: Arc<dyn ServiceBus>, fixture: Fixture, config: SuiteConfig) -> Self {
        Self {
            bus,
            fixture,
            config,
        }
    }

    /// Suite configuration for this run
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// The bus under test
    pub fn bus(&self) -> &dyn ServiceBus {
        self.bus.as_ref()
    }

    /// The fixture's status subscription
    pub fn status(&self) -> &Subscription {
        self.fixture.status()
    }

    /// Log a step the way the original scripts narrated theirs
    pub fn step(&self, message: impl AsRef<str>) {
        info!("- {}", message.as_ref());
    }

    /// Pause for the configured settle time between visual steps
    pub async fn settle(&self) {
        let settle = self.config.settle();
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
    }

    /// Give the fixture back for tear-down
    pub fn into_fixture(self) -> Fixture {
        self.fixture
    }
}

/// One conformance scenario
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Stable identifier used for filtering and reporting
    fn name(&self) -> &str;

    /// One-line description for `--list`
    fn summary(&self) -> &str;

    /// Drive the service and assert; the fixture is already set up
    async fn run(&self, ctx: &ScenarioContext) -> Result<()>;
}

/// Ordered collection of scenarios
#[derive(Default)]
pub struct Registry {
    scenarios: Vec<Arc<dyn Scenario>>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scenario
    pub fn register(&mut self, scenario: impl Scenario + 'static) {
        self.scenarios.push(Arc::new(scenario));
    }

    /// All registered scenarios, registration order
    pub fn scenarios(&self) -> &[Arc<dyn Scenario>] {
        &self.scenarios
    }

    /// Scenarios whose name contains `filter`
    pub fn filtered(&self, filter: &str) -> Vec<Arc<dyn Scenario>> {
        self.scenarios
            .iter()
            .filter(|scenario| scenario.name().contains(filter))
            .cloned()
            .collect()
    }

    /// Number of registered scenarios
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl Scenario for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn summary(&self) -> &str {
            "test scenario"
        }
        async fn run(&self, _ctx: &ScenarioContext) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = Registry::new();
        registry.register(Named("connect_disconnect"));
        registry.register(Named("mute"));
        let names: Vec<_> = registry.scenarios().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["connect_disconnect", "mute"]);
    }

    #[test]
    fn test_registry_filter_by_substring() {
        let mut registry = Registry::new();
        registry.register(Named("connect_disconnect"));
        registry.register(Named("dual_connect"));
        registry.register(Named("mute"));
        let filtered = registry.filtered("connect");
        assert_eq!(filtered.len(), 2);
    }
}

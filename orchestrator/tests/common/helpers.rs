//! Test helpers and builder patterns for orchestrator tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use orchestrator::*;
use shared::Task;

use super::fixtures::TestFixtures;

/// Builder for dispatchers whose agents are mocks with sensible defaults
pub struct DispatcherBuilder {
    overrides: HashMap<String, Arc<dyn Capability>>,
    config: DispatchConfig,
    routing: RoutingTable,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            config: DispatchConfig::default(),
            routing: RoutingTable::v1(),
        }
    }

    /// Configure one agent's mock with a setup function
    pub fn with_agent<F>(mut self, name: &str, setup: F) -> Self
    where
        F: FnOnce(&mut MockCapability),
    {
        let mut capability = MockCapability::new();
        setup(&mut capability);
        self.overrides.insert(name.to_string(), Arc::new(capability));
        self
    }

    /// Replace one agent with a hand-written capability
    pub fn with_capability(mut self, name: &str, capability: Arc<dyn Capability>) -> Self {
        self.overrides.insert(name.to_string(), capability);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.capability_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    pub fn with_routing(mut self, routing: RoutingTable) -> Self {
        self.routing = routing;
        self
    }

    pub fn try_build(mut self) -> OrchestratorResult<TaskDispatcher> {
        let mut registry = AgentRegistry::new();
        for spec in TestFixtures::agent_specs() {
            let capability = self
                .overrides
                .remove(&spec.name)
                .unwrap_or_else(|| TestHelpers::healthy_agent(&spec.name));
            registry.register(spec, capability)?;
        }

        TaskDispatcher::new(
            Arc::new(registry),
            Arc::new(SystemMetrics::new()),
            self.routing,
            self.config,
        )
    }

    pub fn build(self) -> TaskDispatcher {
        self.try_build().expect("test dispatcher should build")
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Dispatcher where every agent answers immediately
    pub fn simple_dispatcher() -> TaskDispatcher {
        DispatcherBuilder::new().build()
    }

    /// Mock agent answering with its fixture payload
    pub fn healthy_agent(name: &str) -> Arc<dyn Capability> {
        let mut capability = MockCapability::new();
        let payload = TestFixtures::payload_for(name);
        capability
            .expect_invoke()
            .returning(move |_| Ok(payload.clone()))
            .times(0..);
        capability.expect_ping().returning(|| Ok(())).times(0..);
        Arc::new(capability)
    }

    /// Capability that sleeps before answering
    pub fn slow_agent(delay: Duration) -> Arc<dyn Capability> {
        Arc::new(SlowCapability { delay })
    }

    /// Capability that sleeps while holding a slot in `gauge`
    pub fn gauged_agent(gauge: Arc<InFlightGauge>, delay: Duration) -> Arc<dyn Capability> {
        Arc::new(GaugedCapability { gauge, delay })
    }
}

/// High-water mark of calls running at the same time
#[derive(Debug, Default)]
pub struct InFlightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightGauge {
    pub fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

struct GaugedCapability {
    gauge: Arc<InFlightGauge>,
    delay: Duration,
}

#[async_trait::async_trait]
impl Capability for GaugedCapability {
    async fn invoke(&self, _task: &Task) -> OrchestratorResult<serde_json::Value> {
        self.gauge.enter();
        tokio::time::sleep(self.delay).await;
        self.gauge.leave();
        Ok(serde_json::json!({ "gauged": true }))
    }

    async fn ping(&self) -> OrchestratorResult<()> {
        Ok(())
    }
}

struct SlowCapability {
    delay: Duration,
}

#[async_trait::async_trait]
impl Capability for SlowCapability {
    async fn invoke(&self, _task: &Task) -> OrchestratorResult<serde_json::Value> {
        tokio::time::sleep(self.delay).await;
        Ok(serde_json::json!({ "slow": true }))
    }

    async fn ping(&self) -> OrchestratorResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

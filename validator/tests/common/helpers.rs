//! Test helpers and builder patterns for validator tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use validator::*;

/// Builder for catalogs of fixed-outcome probes
pub struct CatalogBuilder {
    components: Vec<ComponentSpec>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self { components: Vec::new() }
    }

    /// Component whose probes answer with `outcomes`, in order
    pub fn component(mut self, name: &str, weight: f64, threshold: f64, outcomes: &[bool]) -> Self {
        let mut component = ComponentSpec::new(name, weight, threshold);
        for (i, passed) in outcomes.iter().enumerate() {
            component = component.with_probe(format!("{name}_probe_{i}"), TestHelpers::fixed_probe(*passed));
        }
        self.components.push(component);
        self
    }

    pub fn with_component(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    pub fn try_build(self) -> ValidatorResult<Catalog> {
        Catalog::new(self.components)
    }

    pub fn build(self) -> Catalog {
        self.try_build().expect("test catalog should be valid")
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Engine with default tuning
    pub fn engine() -> ValidationEngine {
        ValidationEngine::new(EngineConfig::default()).expect("default engine config is valid")
    }

    /// Mock probe that always reports `passed`
    pub fn fixed_probe(passed: bool) -> Arc<dyn Probe> {
        let mut probe = MockProbe::new();
        probe
            .expect_check()
            .returning(move || Ok(ProbeOutcome::from_bool(passed)))
            .times(0..);
        Arc::new(probe)
    }

    /// Mock probe that counts its invocations
    pub fn counting_probe(calls: Arc<AtomicUsize>) -> Arc<dyn Probe> {
        let mut probe = MockProbe::new();
        probe.expect_check().returning(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProbeOutcome::pass())
        });
        Arc::new(probe)
    }

    /// Mock probe that errors like a refused connection
    pub fn erroring_probe(name: &'static str) -> Arc<dyn Probe> {
        let mut probe = MockProbe::new();
        probe
            .expect_check()
            .returning(move || Err(ValidatorError::probe(name, "connection refused")));
        Arc::new(probe)
    }

    /// Probe that sleeps while holding a slot in `gauge`
    pub fn gauged_probe(gauge: Arc<InFlightGauge>, delay: Duration) -> Arc<dyn Probe> {
        Arc::new(GaugedProbe { gauge, delay })
    }

    /// The platform catalog with every probe passing
    pub fn passing_builtin_catalog() -> Catalog {
        CatalogConfig::builtin(&Endpoints::default())
            .build(|_| Ok(Self::fixed_probe(true)))
            .expect("built-in catalog is valid")
    }
}

/// High-water mark of probes running at the same time
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

struct GaugedProbe {
    gauge: Arc<InFlightGauge>,
    delay: Duration,
}

#[async_trait::async_trait]
impl Probe for GaugedProbe {
    async fn check(&self) -> ValidatorResult<ProbeOutcome> {
        self.gauge.enter();
        tokio::time::sleep(self.delay).await;
        self.gauge.leave();
        Ok(ProbeOutcome::pass())
    }
}

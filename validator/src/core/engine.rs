//! Validation engine
//!
//! Every probe in the catalog runs as its own task on a `JoinSet`, bounded by
//! a semaphore and wrapped in its own timeout. A probe that errors, times
//! out or panics is recorded as failed and never disturbs its siblings.
//! When the run deadline passes, unfinished probes are aborted and the
//! results gathered so far are aggregated.

use chrono::Utc;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use shared::{service_debug, service_info, service_warn, ServiceId};

use super::report::{OverallHealth, ValidationReport};
use super::{Catalog, ComponentSpec};
use crate::error::{ValidatorError, ValidatorResult};
use crate::traits::Probe;
use crate::types::{ComponentResults, ComponentStatus, ComponentValidation, ProbeResult};

/// Score given to a component none of whose probes completed
pub const NEUTRAL_COMPONENT_SCORE: f64 = 85.0;

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound for one probe
    pub probe_timeout: Duration,
    /// Probes in flight at once
    pub max_concurrency: usize,
    /// Upper bound for the whole run; `None` waits for every probe
    pub deadline: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(10),
            max_concurrency: 8,
            deadline: Some(Duration::from_secs(60)),
        }
    }
}

/// Percentage of passed probes; undefined without probes.
///
/// The value is exact. Rounding happens only where it is reported.
pub fn success_rate(passed: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(100.0 * passed as f64 / total as f64)
}

/// Fold the probe slots of one component into its validation.
///
/// `slots` follows the component's probe order; `None` marks a probe that
/// did not finish before the deadline.
pub fn aggregate_component(spec: &ComponentSpec, slots: Vec<Option<ProbeResult>>) -> ComponentValidation {
    let mut probes = Vec::with_capacity(slots.len());
    let mut skipped_probes = Vec::new();
    for (probe, slot) in spec.probes.iter().zip(slots) {
        match slot {
            Some(result) => probes.push(result),
            None => skipped_probes.push(probe.name.clone()),
        }
    }

    let passed = probes.iter().filter(|probe| probe.passed).count();
    let success_rate = success_rate(passed, probes.len());
    let score = match success_rate {
        Some(rate) => rate,
        None => {
            service_warn!(
                ServiceId::current(),
                "⚖️ {}: no probe data, using neutral score {:.1}",
                spec.name,
                NEUTRAL_COMPONENT_SCORE
            );
            NEUTRAL_COMPONENT_SCORE
        }
    };

    ComponentValidation {
        component_name: spec.name.clone(),
        success_rate,
        score,
        weight: spec.weight,
        threshold: spec.threshold,
        status: ComponentStatus::from_score(score, spec.threshold),
        probes,
        skipped_probes,
    }
}

/// Weighted score over the catalog, classified unrounded
pub fn overall_health(catalog: &Catalog, components: &ComponentResults) -> OverallHealth {
    let weighted: f64 = catalog
        .components()
        .iter()
        .map(|spec| {
            let score = components
                .get(&spec.name)
                .map(|component| component.score)
                .unwrap_or(NEUTRAL_COMPONENT_SCORE);
            spec.weight * score
        })
        .sum();

    OverallHealth::from_score(weighted)
}

/// Runs catalogs and produces reports
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> ValidatorResult<Self> {
        if config.max_concurrency == 0 {
            return Err(ValidatorError::config("max_concurrency", "must be at least 1"));
        }
        if config.probe_timeout.is_zero() {
            return Err(ValidatorError::config("probe_timeout", "must be greater than zero"));
        }
        if config.deadline.is_some_and(|deadline| deadline.is_zero()) {
            return Err(ValidatorError::config("deadline", "must be greater than zero"));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every probe of the catalog and aggregate per component
    pub async fn run_validation(&self, catalog: &Catalog) -> ComponentResults {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let probe_timeout = self.config.probe_timeout;

        let mut slots: Vec<Vec<Option<ProbeResult>>> = catalog
            .components()
            .iter()
            .map(|component| vec![None; component.probes.len()])
            .collect();

        let mut running = JoinSet::new();
        for (component_index, component) in catalog.components().iter().enumerate() {
            for (probe_index, spec) in component.probes.iter().enumerate() {
                let name = spec.name.clone();
                let probe = Arc::clone(&spec.probe);
                let semaphore = Arc::clone(&semaphore);
                running.spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    let result = run_probe(&name, probe.as_ref(), probe_timeout).await;
                    (component_index, probe_index, result)
                });
            }
        }

        service_debug!(
            ServiceId::current(),
            "🚦 Running {} probes across {} components",
            catalog.probe_count(),
            catalog.components().len()
        );

        let deadline = self.config.deadline.map(|limit| tokio::time::Instant::now() + limit);
        loop {
            let next = match deadline {
                Some(at) => {
                    let waited = tokio::time::timeout_at(at, running.join_next()).await;
                    let Ok(next) = waited else {
                        service_warn!(
                            ServiceId::current(),
                            "⏰ Validation deadline reached, aborting {} unfinished probes",
                            running.len()
                        );
                        running.abort_all();
                        break;
                    };
                    next
                }
                None => running.join_next().await,
            };

            match next {
                Some(Ok((component_index, probe_index, result))) => {
                    slots[component_index][probe_index] = Some(result);
                }
                Some(Err(error)) => {
                    service_debug!(ServiceId::current(), "Probe task ended without a result: {}", error);
                }
                None => break,
            }
        }

        let components = catalog
            .components()
            .iter()
            .zip(slots)
            .map(|(spec, slots)| {
                let component = aggregate_component(spec, slots);
                service_info!(
                    ServiceId::current(),
                    "🔍 {}: {:.1}% ({}) {}/{} probes passed",
                    component.component_name,
                    component.score,
                    component.status,
                    component.passed_probes(),
                    component.probes.len()
                );
                component
            })
            .collect();

        ComponentResults::new(components)
    }

    /// Full run: probes, aggregation, classification and recommendations
    pub async fn validate(&self, catalog: &Catalog) -> ValidationReport {
        let started_at = Utc::now();
        let started = Instant::now();

        let components = self.run_validation(catalog).await;
        let health = overall_health(catalog, &components);

        service_info!(
            ServiceId::current(),
            "🎯 Overall health {:.1}% {} ({})",
            health.overall_score,
            health.status,
            health.grade
        );

        ValidationReport::build(catalog, components, health, started_at, started.elapsed())
    }
}

/// One probe under its timeout with panics caught
async fn run_probe(name: &str, probe: &dyn Probe, timeout: Duration) -> ProbeResult {
    let guarded = AssertUnwindSafe(probe.check()).catch_unwind();
    match tokio::time::timeout(timeout, guarded).await {
        Ok(Ok(Ok(outcome))) => ProbeResult::from_outcome(name, outcome),
        Ok(Ok(Err(error))) => ProbeResult::failed(name, error.to_string()),
        Ok(Err(panic)) => ProbeResult::failed(name, format!("probe panicked: {}", panic_message(panic.as_ref()))),
        Err(_) => ProbeResult::failed(
            name,
            ValidatorError::ProbeTimeout {
                probe: name.to_string(),
                timeout,
            }
            .to_string(),
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Grade, HealthStatus};
    use crate::traits::MockProbe;
    use crate::types::ProbeOutcome;
    use async_trait::async_trait;

    fn fixed(passed: bool) -> Arc<dyn Probe> {
        let mut probe = MockProbe::new();
        probe.expect_check().returning(move || Ok(ProbeOutcome::from_bool(passed)));
        Arc::new(probe)
    }

    struct Sleepy(Duration);

    #[async_trait]
    impl Probe for Sleepy {
        async fn check(&self) -> ValidatorResult<ProbeOutcome> {
            tokio::time::sleep(self.0).await;
            Ok(ProbeOutcome::pass())
        }
    }

    struct Panicky;

    #[async_trait]
    impl Probe for Panicky {
        async fn check(&self) -> ValidatorResult<ProbeOutcome> {
            panic!("probe exploded");
        }
    }

    fn engine(config: EngineConfig) -> ValidationEngine {
        ValidationEngine::new(config).unwrap()
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(success_rate(3, 4), Some(75.0));
        assert_eq!(success_rate(2, 3), Some(200.0 / 3.0));
        assert_eq!(success_rate(0, 5), Some(0.0));
        assert_eq!(success_rate(0, 0), None);
    }

    #[test]
    fn test_threshold_compares_exact_rate() {
        let spec = ComponentSpec::new("vault", 1.0, 66.7)
            .with_probe("a", fixed(true))
            .with_probe("b", fixed(true))
            .with_probe("c", fixed(false));
        let slots = vec![
            Some(ProbeResult::from_outcome("a", ProbeOutcome::pass())),
            Some(ProbeResult::from_outcome("b", ProbeOutcome::pass())),
            Some(ProbeResult::from_outcome("c", ProbeOutcome::fail())),
        ];

        let component = aggregate_component(&spec, slots);

        assert_eq!(component.reported_rate(), Some(66.7));
        assert_eq!(component.status, ComponentStatus::Fail);
    }

    #[test]
    fn test_overall_classifies_exact_score() {
        let mut nine_of_ten = ComponentSpec::new("orchestrator", 0.1, 80.0);
        let mut slots_a = Vec::new();
        for i in 0..10 {
            let name = format!("a{i}");
            nine_of_ten = nine_of_ten.with_probe(name.as_str(), fixed(i < 9));
            slots_a.push(Some(ProbeResult::from_outcome(name, ProbeOutcome::from_bool(i < 9))));
        }
        let mut five_of_eleven = ComponentSpec::new("agents", 0.9, 80.0);
        let mut slots_b = Vec::new();
        for i in 0..11 {
            let name = format!("b{i}");
            five_of_eleven = five_of_eleven.with_probe(name.as_str(), fixed(i < 5));
            slots_b.push(Some(ProbeResult::from_outcome(name, ProbeOutcome::from_bool(i < 5))));
        }

        let components = ComponentResults::new(vec![
            aggregate_component(&nine_of_ten, slots_a),
            aggregate_component(&five_of_eleven, slots_b),
        ]);
        let catalog = Catalog::new(vec![nine_of_ten, five_of_eleven]).unwrap();
        let health = overall_health(&catalog, &components);

        assert!(health.overall_score < 50.0);
        assert_eq!(health.reported_score(), 49.9);
        assert_eq!(health.status, HealthStatus::Critical);
        assert_eq!(health.grade, Grade::F);
    }

    #[test]
    fn test_aggregate_marks_skipped_and_defaults() {
        let spec = ComponentSpec::new("vault", 1.0, 90.0)
            .with_probe("a", fixed(true))
            .with_probe("b", fixed(true));

        let component = aggregate_component(&spec, vec![None, None]);

        assert_eq!(component.success_rate, None);
        assert_eq!(component.score, NEUTRAL_COMPONENT_SCORE);
        assert_eq!(component.status, ComponentStatus::Fail);
        assert_eq!(component.skipped_probes, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_failing_probe_does_not_stop_siblings() {
        let catalog = Catalog::new(vec![ComponentSpec::new("agents", 1.0, 80.0)
            .with_probe("huraii", fixed(true))
            .with_probe("cloe", fixed(false))
            .with_probe("horace", fixed(true))
            .with_probe("thorius", fixed(true))])
        .unwrap();

        let components = engine(EngineConfig::default()).run_validation(&catalog).await;
        let agents = components.get("agents").unwrap();

        assert_eq!(agents.success_rate, Some(75.0));
        assert_eq!(agents.status, ComponentStatus::Fail);
        assert_eq!(
            agents.probes.iter().map(|p| p.probe_name.as_str()).collect::<Vec<_>>(),
            vec!["huraii", "cloe", "horace", "thorius"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_and_panic_count_as_failures() {
        let config = EngineConfig {
            probe_timeout: Duration::from_millis(100),
            ..EngineConfig::default()
        };
        let catalog = Catalog::new(vec![ComponentSpec::new("recovery", 1.0, 75.0)
            .with_probe("slow", Arc::new(Sleepy(Duration::from_secs(30))))
            .with_probe("panics", Arc::new(Panicky))
            .with_probe("fine", fixed(true))])
        .unwrap();

        let components = engine(config).run_validation(&catalog).await;
        let recovery = components.get("recovery").unwrap();

        assert_eq!(recovery.reported_rate(), Some(33.3));
        let slow = recovery.probe("slow").unwrap();
        assert!(!slow.passed);
        assert!(slow.detail.as_ref().unwrap()["error"].as_str().unwrap().contains("timed out"));
        let panics = recovery.probe("panics").unwrap();
        assert!(panics.detail.as_ref().unwrap()["error"]
            .as_str()
            .unwrap()
            .contains("probe exploded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_keeps_completed_results() {
        let config = EngineConfig {
            probe_timeout: Duration::from_secs(120),
            max_concurrency: 4,
            deadline: Some(Duration::from_secs(5)),
        };
        let catalog = Catalog::new(vec![
            ComponentSpec::new("fast", 0.5, 80.0)
                .with_probe("one", fixed(true))
                .with_probe("stuck", Arc::new(Sleepy(Duration::from_secs(60)))),
            ComponentSpec::new("stalled", 0.5, 80.0).with_probe("only", Arc::new(Sleepy(Duration::from_secs(60)))),
        ])
        .unwrap();

        let components = engine(config).run_validation(&catalog).await;

        let fast = components.get("fast").unwrap();
        assert_eq!(fast.success_rate, Some(100.0));
        assert_eq!(fast.skipped_probes, vec!["stuck"]);

        let stalled = components.get("stalled").unwrap();
        assert!(stalled.is_defaulted());
        assert_eq!(stalled.status, ComponentStatus::Pass);

        assert_eq!(overall_health(&catalog, &components).reported_score(), 92.5);
    }

    #[test]
    fn test_engine_keeps_config() {
        let engine = engine(EngineConfig {
            max_concurrency: 5,
            deadline: None,
            ..EngineConfig::default()
        });

        assert_eq!(engine.config().max_concurrency, 5);
        assert_eq!(engine.config().deadline, None);
    }

    #[test]
    fn test_invalid_engine_config() {
        let zero = EngineConfig {
            max_concurrency: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            ValidationEngine::new(zero),
            Err(ValidatorError::ConfigurationError { .. })
        ));
    }
}

//! Task dispatcher
//!
//! Resolves a task's route, invokes every routed capability concurrently
//! (bounded by a semaphore, each call under its own timeout), merges the
//! payloads and updates the registry and system counters.

use chrono::Utc;
use futures_util::future::join_all;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use shared::{service_debug, service_info, service_warn, ServiceId, SystemStatusReport, Task, TaskSubmission, TaskType};

use crate::core::{AgentRegistry, RoutingTable, SystemMetrics};
use crate::error::{OrchestratorError, OrchestratorResult};

/// Error text returned for task types with no route
pub const UNKNOWN_TASK_TYPE: &str = "Unknown task type";

/// Outcome label of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Completed,
    Failed,
}

/// Per-capability payloads, serialized as a map in routing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityResults(Vec<(String, Value)>);

impl CapabilityResults {
    fn push(&mut self, name: String, payload: Value) {
        self.0.push((name, payload));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CapabilityResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, payload) in &self.0 {
            map.serialize_entry(name, payload)?;
        }
        map.end()
    }
}

/// Composite result of one routed dispatch. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestrationResult {
    /// `<PREFIX>_<unix seconds>`; ids may repeat within one second
    #[serde(rename = "orchestration_id")]
    pub id: String,
    pub task_type: TaskType,
    pub agents_involved: Vec<String>,
    pub status: DispatchStatus,
    pub results: CapabilityResults,
    pub routing_version: u32,
    /// Seconds spent outside capability calls
    pub coordination_time: f64,
    /// End-to-end seconds
    pub total_time: f64,
}

/// Result shape for tasks that could not be routed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRejection {
    pub error: String,
    pub status: DispatchStatus,
}

impl TaskRejection {
    pub fn unknown_task_type() -> Self {
        Self {
            error: UNKNOWN_TASK_TYPE.to_string(),
            status: DispatchStatus::Failed,
        }
    }
}

/// What `dispatch` hands back: always a well-formed result, never a fault
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DispatchOutcome {
    Routed(OrchestrationResult),
    Rejected(TaskRejection),
}

impl DispatchOutcome {
    pub fn status(&self) -> DispatchStatus {
        match self {
            DispatchOutcome::Routed(result) => result.status,
            DispatchOutcome::Rejected(rejection) => rejection.status,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == DispatchStatus::Completed
    }

    pub fn result(&self) -> Option<&OrchestrationResult> {
        match self {
            DispatchOutcome::Routed(result) => Some(result),
            DispatchOutcome::Rejected(_) => None,
        }
    }
}

/// Dispatcher tuning
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound for one capability invocation
    pub capability_timeout: Duration,
    /// Upper bound for one heartbeat ping
    pub heartbeat_timeout: Duration,
    /// Capabilities invoked at once within a single dispatch
    pub max_concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            capability_timeout: Duration::from_secs(30),
            heartbeat_timeout: Duration::from_secs(5),
            max_concurrency: 4,
        }
    }
}

/// Routes tasks to capabilities and keeps the shared counters current
pub struct TaskDispatcher {
    registry: Arc<AgentRegistry>,
    metrics: Arc<SystemMetrics>,
    routing: RoutingTable,
    config: DispatchConfig,
}

impl TaskDispatcher {
    /// Build a dispatcher. Fails fast when the routing table or config is inconsistent.
    pub fn new(
        registry: Arc<AgentRegistry>,
        metrics: Arc<SystemMetrics>,
        routing: RoutingTable,
        config: DispatchConfig,
    ) -> OrchestratorResult<Self> {
        if config.max_concurrency == 0 {
            return Err(OrchestratorError::config("max_concurrency", "must be at least 1"));
        }
        if config.capability_timeout.is_zero() {
            return Err(OrchestratorError::config("capability_timeout", "must be greater than zero"));
        }
        routing.validate(&registry)?;

        Ok(Self {
            registry,
            metrics,
            routing,
            config,
        })
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<SystemMetrics> {
        &self.metrics
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Accept a raw `{type, description}` submission
    pub async fn submit(&self, submission: TaskSubmission) -> DispatchOutcome {
        self.dispatch(submission.into_task()).await
    }

    /// Route `task` to its capabilities and assemble the composite result
    pub async fn dispatch(&self, task: Task) -> DispatchOutcome {
        let started = Instant::now();
        let task_type = task.task_type();

        let Some(route) = self.routing.route(task_type) else {
            self.metrics.record_failure();
            service_warn!(ServiceId::current(), "❓ Rejected task: {}", UNKNOWN_TASK_TYPE);
            return DispatchOutcome::Rejected(TaskRejection::unknown_task_type());
        };

        let id = format!("{}_{}", task_type.id_prefix(), Utc::now().timestamp());
        service_debug!(
            ServiceId::current(),
            "📨 Dispatching {} to {:?}, submitted {}ms ago",
            id,
            route,
            (Utc::now() - task.submitted_at()).num_milliseconds()
        );

        let semaphore = Semaphore::new(self.config.max_concurrency);
        let fan_out_started = Instant::now();
        let outcomes = join_all(route.iter().map(|name| self.invoke(name, &task, &semaphore))).await;
        let fan_out = fan_out_started.elapsed();

        let mut results = CapabilityResults::default();
        let mut failures = 0usize;
        for (name, outcome) in route.iter().zip(outcomes) {
            match outcome {
                Ok(payload) => {
                    self.registry.record_success(name);
                    results.push(name.clone(), payload);
                }
                Err(error) => {
                    failures += 1;
                    self.registry.record_failure(name);
                    service_warn!(ServiceId::current(), "⚠️ {} capability {} failed: {}", id, name, error);
                    results.push(name.clone(), json!({ "status": "failed", "error": error.to_string() }));
                }
            }
        }

        let status = if failures == 0 {
            self.metrics.record_success();
            DispatchStatus::Completed
        } else {
            self.metrics.record_failure();
            DispatchStatus::Failed
        };

        let total = started.elapsed();
        let coordination = total.saturating_sub(fan_out);

        service_info!(
            ServiceId::current(),
            "🎯 {} {:?}: {} capabilities, {} failed, {:.3}s",
            id,
            status,
            route.len(),
            failures,
            total.as_secs_f64()
        );

        DispatchOutcome::Routed(OrchestrationResult {
            id,
            task_type,
            agents_involved: route.to_vec(),
            status,
            results,
            routing_version: self.routing.version(),
            coordination_time: coordination.as_secs_f64(),
            total_time: total.as_secs_f64(),
        })
    }

    /// One capability call under the concurrency limit and its own timeout
    async fn invoke(&self, name: &str, task: &Task, semaphore: &Semaphore) -> OrchestratorResult<Value> {
        let _permit = semaphore.acquire().await.map_err(|e| OrchestratorError::CapabilityFailed {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let capability = self.registry.capability(name).ok_or_else(|| OrchestratorError::CapabilityFailed {
            name: name.to_string(),
            message: "not registered".to_string(),
        })?;

        let timeout = self.config.capability_timeout;
        match tokio::time::timeout(timeout, capability.invoke(task)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(OrchestratorError::CapabilityTimeout {
                name: name.to_string(),
                timeout,
            }),
        }
    }

    /// Ping every registered capability and refresh agent status.
    ///
    /// Returns how many agents answered.
    pub async fn heartbeat(&self) -> usize {
        let names: Vec<String> = self.registry.names().map(str::to_string).collect();

        let checks = names.iter().map(|name| async move {
            let reachable = match self.registry.capability(name) {
                Some(capability) => matches!(
                    tokio::time::timeout(self.config.heartbeat_timeout, capability.ping()).await,
                    Ok(Ok(()))
                ),
                None => false,
            };
            self.registry.record_heartbeat(name, reachable);
            reachable
        });

        let reachable = join_all(checks).await.into_iter().filter(|ok| *ok).count();
        self.metrics.mark_synced(Utc::now());

        service_debug!(ServiceId::current(), "💓 Heartbeat: {}/{} agents reachable", reachable, names.len());
        reachable
    }

    /// Status/health query payload
    pub fn system_status(&self) -> SystemStatusReport {
        SystemStatusReport {
            system_status: self.registry.system_status().to_string(),
            uptime_hours: self.metrics.uptime_hours(),
            agents_status: self.registry.snapshot(),
            metrics: self.metrics.summary(),
            last_sync: self.metrics.last_sync().to_rfc3339(),
            hardware_allocation: self.registry.hardware_allocation(),
        }
    }
}

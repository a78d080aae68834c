//! Offline capability with fixed payloads
//!
//! Mirrors what each agent answers for the task types routed to it, so the
//! orchestrator can run end to end without GPU or network access.

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{Task, TaskType};

use crate::error::OrchestratorResult;
use crate::traits::Capability;

/// Canned behaviour for one agent
pub struct SimulatedCapability {
    name: String,
}

impl SimulatedCapability {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn payload(&self, task: &Task) -> Value {
        match (self.name.as_str(), task.task_type()) {
            ("huraii", _) => json!({
                "status": "GPU processing",
                "time": "45s",
                "prompt": task.description(),
            }),
            ("cloe", TaskType::MarketAnalysis) => json!({
                "trend_score": 0.88,
                "market_demand": "very high",
                "price_recommendation": "$150-300",
                "collector_matches": 12,
            }),
            ("cloe", _) => json!({ "market_score": 0.85, "demand": "high" }),
            ("horace", TaskType::ContentOptimization) => json!({
                "seo_score": 94,
                "readability": "excellent",
                "engagement_potential": "very high",
                "keyword_optimization": "optimal",
            }),
            ("horace", _) => json!({ "seo_score": 92, "engagement": "high" }),
            (name, task_type) => json!({
                "agent": name,
                "task_type": task_type,
                "status": "acknowledged",
            }),
        }
    }
}

#[async_trait]
impl Capability for SimulatedCapability {
    async fn invoke(&self, task: &Task) -> OrchestratorResult<Value> {
        Ok(self.payload(task))
    }

    async fn ping(&self) -> OrchestratorResult<()> {
        Ok(())
    }
}

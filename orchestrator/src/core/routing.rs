//! Static task-type routing
//!
//! Maps each routable task type to the ordered capabilities it invokes.
//! The match over `TaskType` is exhaustive, so adding a task type does not
//! compile until it is given a route.

use shared::TaskType;

use super::AgentRegistry;
use crate::error::{OrchestratorError, OrchestratorResult};

/// Version of the built-in routing table; bump whenever a route changes
pub const ROUTING_VERSION: u32 = 1;

/// Ordered capability lists per task type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    version: u32,
    art_generation: Vec<String>,
    market_analysis: Vec<String>,
    content_optimization: Vec<String>,
}

impl RoutingTable {
    pub fn new(
        version: u32,
        art_generation: Vec<String>,
        market_analysis: Vec<String>,
        content_optimization: Vec<String>,
    ) -> Self {
        Self {
            version,
            art_generation,
            market_analysis,
            content_optimization,
        }
    }

    /// Art generation fans out to the generator plus market and SEO review
    pub fn v1() -> Self {
        let names = |list: &[&str]| -> Vec<String> { list.iter().map(|name| name.to_string()).collect() };
        Self::new(
            ROUTING_VERSION,
            names(&["huraii", "cloe", "horace"]),
            names(&["cloe"]),
            names(&["horace"]),
        )
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Capabilities for `task_type`, or `None` when the type is not routable
    pub fn route(&self, task_type: TaskType) -> Option<&[String]> {
        match task_type {
            TaskType::ArtGeneration => Some(&self.art_generation),
            TaskType::MarketAnalysis => Some(&self.market_analysis),
            TaskType::ContentOptimization => Some(&self.content_optimization),
            TaskType::Unknown => None,
        }
    }

    /// Check every route against the registry. Called once at startup.
    pub fn validate(&self, registry: &AgentRegistry) -> OrchestratorResult<()> {
        for task_type in TaskType::ROUTABLE {
            let Some(route) = self.route(task_type) else {
                continue;
            };

            if route.is_empty() {
                return Err(OrchestratorError::config(
                    format!("routing.{task_type}"),
                    "route has no capabilities",
                ));
            }

            let mut seen = std::collections::HashSet::new();
            for capability in route {
                if !registry.contains(capability) {
                    return Err(OrchestratorError::UnknownCapability {
                        task_type: task_type.to_string(),
                        capability: capability.clone(),
                    });
                }
                if !seen.insert(capability.as_str()) {
                    return Err(OrchestratorError::config(
                        format!("routing.{task_type}"),
                        format!("capability {capability} listed twice"),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::v1()
    }
}

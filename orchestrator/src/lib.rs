//! Orchestrator library for routing tasks to agent capabilities
//!
//! This library provides the task dispatcher, the agent registry with its
//! live counters, and the process-wide system metrics. Capability endpoints
//! are injected through the [`Capability`] trait so dispatch logic can be
//! exercised against deterministic fakes.

pub mod core;
pub mod dispatcher;
pub mod error;
pub mod services;
pub mod traits;
pub mod web;

// Re-export commonly used types
pub use crate::core::{AgentRegistry, MetricsSnapshot, RoutingTable, SystemMetrics, OFFLINE_AFTER_CONSECUTIVE_FAILURES, ROUTING_VERSION};
pub use dispatcher::{DispatchConfig, DispatchOutcome, DispatchStatus, UNKNOWN_TASK_TYPE, OrchestrationResult, TaskDispatcher, TaskRejection};
pub use error::{OrchestratorError, OrchestratorResult};
pub use traits::{Capability, MockCapability};

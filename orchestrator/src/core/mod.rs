//! Core orchestration state
//!
//! Registry, metrics and routing hold no I/O of their own; the dispatcher
//! and the heartbeat loop drive them.

pub mod metrics;
pub mod registry;
pub mod routing;

pub use metrics::{MetricsSnapshot, SystemMetrics};
pub use registry::{AgentRegistry, OFFLINE_AFTER_CONSECUTIVE_FAILURES};
pub use routing::{RoutingTable, ROUTING_VERSION};

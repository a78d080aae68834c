//! Shared types for the agent orchestration and health validation services
//!
//! Contains only the types that cross service boundaries: task and agent
//! vocabulary, the status-query payload, and the logging conventions used by
//! both binaries. Service-internal types stay in their own crates.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{HardwareAllocation, MetricsSummary, SystemStatusReport, TaskSubmission};

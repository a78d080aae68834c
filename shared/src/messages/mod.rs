//! Message types exchanged across service boundaries
//!
//! - `task`: task submission payload accepted by the orchestrator
//! - `status`: system status payload served by the orchestrator and read by probes

pub mod status;
pub mod task;

pub use status::{HardwareAllocation, MetricsSummary, SystemStatusReport};
pub use task::TaskSubmission;

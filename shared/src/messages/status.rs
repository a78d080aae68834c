//! System status payload

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::AgentStatus;

/// Response of the status/health query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatusReport {
    pub system_status: String,
    pub uptime_hours: f64,
    pub agents_status: BTreeMap<String, AgentStatus>,
    pub metrics: MetricsSummary,
    pub last_sync: String,
    pub hardware_allocation: HardwareAllocation,
}

/// Request counters as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_requests: u64,
    /// Percentage string such as `"97.5%"`
    pub success_rate: String,
    pub failed_operations: u64,
}

/// How many registered agents run on each hardware class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HardwareAllocation {
    pub gpu_agents: u32,
    pub cpu_agents: u32,
}

impl MetricsSummary {
    /// Build from raw counters; an idle system reports `0.0%`
    pub fn from_counters(total_requests: u64, successful_operations: u64, failed_operations: u64) -> Self {
        let rate = successful_operations as f64 / total_requests.max(1) as f64 * 100.0;
        Self {
            total_requests,
            success_rate: format!("{rate:.1}%"),
            failed_operations,
        }
    }
}

//! Process-wide request counters
//!
//! Every field is updated independently with atomic operations, so
//! concurrent dispatches never lose an increment and readers never block.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use shared::MetricsSummary;

/// Counters shared by the dispatcher, the heartbeat loop and status queries
#[derive(Debug)]
pub struct SystemMetrics {
    total_requests: AtomicU64,
    successful_operations: AtomicU64,
    failed_operations: AtomicU64,

    /// Monotonic start point; uptime is always derived from it at read time
    uptime_start: Instant,

    /// Unix milliseconds of the last heartbeat sweep
    last_sync_millis: AtomicI64,
}

/// Plain copy of the counters at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
}

impl SystemMetrics {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_operations: AtomicU64::new(0),
            failed_operations: AtomicU64::new(0),
            uptime_start: Instant::now(),
            last_sync_millis: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    /// Count a dispatch that completed
    pub fn record_success(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.successful_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dispatch that failed or was rejected
    pub fn record_failure(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.failed_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Stamp the time of the latest registry sync
    pub fn mark_synced(&self, at: DateTime<Utc>) {
        self.last_sync_millis.store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_sync(&self) -> DateTime<Utc> {
        let millis = self.last_sync_millis.load(Ordering::Relaxed);
        Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now)
    }

    pub fn uptime(&self) -> Duration {
        self.uptime_start.elapsed()
    }

    /// Uptime in hours rounded to two decimals
    pub fn uptime_hours(&self) -> f64 {
        (self.uptime().as_secs_f64() / 3600.0 * 100.0).round() / 100.0
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_operations: self.successful_operations.load(Ordering::Relaxed),
            failed_operations: self.failed_operations.load(Ordering::Relaxed),
        }
    }

    /// Client-facing summary with the success rate as a percentage string
    pub fn summary(&self) -> MetricsSummary {
        let snapshot = self.snapshot();
        MetricsSummary::from_counters(
            snapshot.total_requests,
            snapshot.successful_operations,
            snapshot.failed_operations,
        )
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

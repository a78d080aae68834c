//! Trait definitions with mockall annotations for testing
//!
//! Probes and report sinks are the validator's only contact with the
//! outside world; the engine and the report builder are pure over them.

use std::path::PathBuf;

use crate::core::ValidationReport;
use crate::error::ValidatorResult;
use crate::types::ProbeOutcome;

/// One independent health check against a subsystem
#[mockall::automock]
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Run the check once.
    ///
    /// `Err` is a transport or setup failure and is recorded as `passed=false`.
    async fn check(&self) -> ValidatorResult<ProbeOutcome>;
}

/// Destination for finished validation reports
#[mockall::automock]
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist the structured report and its textual summary, returning what was written
    async fn persist(&self, report: &ValidationReport, summary: &str) -> ValidatorResult<Vec<PathBuf>>;
}

//! Validator library for scoring system health
//!
//! Runs a catalog of independent probes grouped into weighted components,
//! folds their outcomes into one score, classifies it and renders the
//! report. Probes are injected through the [`Probe`] trait so the scoring
//! logic can run against deterministic fakes.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use crate::core::{
    classify, Catalog, CatalogConfig, ComponentSpec, EngineConfig, Endpoints, Grade, HealthStatus, OverallHealth,
    ProbeConfig, ProbeKind, ValidationEngine, ValidationReport, NEUTRAL_COMPONENT_SCORE,
};
pub use error::{ValidatorError, ValidatorResult};
pub use traits::{MockProbe, MockReportSink, Probe, ReportSink};
pub use types::*;

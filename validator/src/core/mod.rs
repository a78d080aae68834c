//! Core validation logic
//!
//! Everything here is pure over the [`Probe`](crate::traits::Probe) trait:
//! the catalog, the engine, classification and report assembly.

pub mod catalog;
pub mod engine;
pub mod grading;
pub mod recommendations;
pub mod report;

pub use catalog::{Catalog, CatalogConfig, ComponentConfig, ComponentSpec, Endpoints, ProbeConfig, ProbeKind, ProbeSpec};
pub use engine::{overall_health, success_rate, EngineConfig, ValidationEngine, NEUTRAL_COMPONENT_SCORE};
pub use grading::{classify, Grade, HealthStatus};
pub use report::{OverallHealth, ValidationReport};

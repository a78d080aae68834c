//! Common test utilities and infrastructure
//!
//! Shared fixtures and builders used across the validator test suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{CatalogBuilder, InFlightGauge, TestHelpers};

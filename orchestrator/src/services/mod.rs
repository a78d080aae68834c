//! Capability endpoint implementations
//!
//! `HttpCapability` talks to a live agent process; `SimulatedCapability`
//! answers with fixed payloads for offline runs and demos.

pub mod http_capability;
pub mod simulated;

pub use http_capability::HttpCapability;
pub use simulated::SimulatedCapability;

//! Test fixtures and data for orchestrator tests

use serde_json::{json, Value};
use shared::{AgentSpec, HardwareClass, TaskSubmission};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const ART_DESCRIPTION: &'static str = "A cosmic jellyfish over a neon city";
    pub const BOGUS_TYPE: &'static str = "bogus";

    /// The four platform agents
    pub fn agent_specs() -> Vec<AgentSpec> {
        vec![
            AgentSpec::new("huraii", HardwareClass::Gpu, 7860),
            AgentSpec::new("cloe", HardwareClass::Cpu, 8000),
            AgentSpec::new("horace", HardwareClass::Cpu, 8001),
            AgentSpec::new("thorius", HardwareClass::Cpu, 8002),
        ]
    }

    /// Expected route per submitted type string
    pub fn expected_routes() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![
            ("art_generation", vec!["huraii", "cloe", "horace"]),
            ("market_analysis", vec!["cloe"]),
            ("content_optimization", vec!["horace"]),
        ]
    }

    /// Payload a healthy agent answers with
    pub fn payload_for(agent: &str) -> Value {
        json!({ "agent": agent, "status": "ok" })
    }

    pub fn submission(task_type: &str) -> TaskSubmission {
        TaskSubmission::new(task_type, Self::ART_DESCRIPTION)
    }
}

//! Test fixtures and data for validator tests

use serde_json::{json, Value};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const AGENTS_STATUS_PATH: &'static str = "/api/v1/agents/status";

    /// Built-in component names in catalog order
    pub fn builtin_components() -> Vec<&'static str> {
        vec![
            "archer_orchestrator",
            "ai_agents",
            "runpod_vault",
            "s3_integration",
            "tola_art_automation",
            "error_recovery",
            "api_endpoints",
            "performance",
        ]
    }

    /// Credentials the built-in env probes look for
    pub fn builtin_env_vars() -> Vec<&'static str> {
        vec!["RUNPOD_API_KEY", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_S3_BUCKET"]
    }

    fn agent(name: &str, hardware: &str, port: u16, status: &str) -> Value {
        json!({
            "name": name,
            "hardware": hardware,
            "port": port,
            "status": status,
            "requests": 12,
            "successes": 11,
            "failures": 1
        })
    }

    /// Orchestrator agents-status payload with every agent active
    pub fn agents_status() -> Value {
        Self::agents_status_with("thorius", "active")
    }

    /// Agents-status payload with one agent's status overridden
    pub fn agents_status_with(agent: &str, status: &str) -> Value {
        let status_of = |name: &str| if name == agent { status } else { "active" };
        json!({
            "cloe": Self::agent("cloe", "CPU", 8000, status_of("cloe")),
            "horace": Self::agent("horace", "CPU", 8001, status_of("horace")),
            "huraii": Self::agent("huraii", "GPU", 7860, status_of("huraii")),
            "thorius": Self::agent("thorius", "CPU", 8002, status_of("thorius")),
        })
    }
}

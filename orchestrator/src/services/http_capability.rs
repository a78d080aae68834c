//! HTTP capability endpoint
//!
//! Each agent exposes `POST /invoke` taking the task as JSON and returning
//! its result payload, plus `GET /health` for liveness.

use async_trait::async_trait;
use serde_json::Value;
use shared::{AgentSpec, Task};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::Capability;

/// Capability backed by an agent's HTTP endpoint
pub struct HttpCapability {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpCapability {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_client(name, base_url, reqwest::Client::new())
    }

    /// Share one connection pool across all agents
    pub fn with_client(name: impl Into<String>, base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Endpoint for a declared agent on `host`
    pub fn for_agent(spec: &AgentSpec, host: &str, client: reqwest::Client) -> Self {
        Self::with_client(&spec.name, format!("http://{}:{}", host, spec.listen_port), client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn failed(&self, message: impl Into<String>) -> OrchestratorError {
        OrchestratorError::CapabilityFailed {
            name: self.name.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Capability for HttpCapability {
    async fn invoke(&self, task: &Task) -> OrchestratorResult<Value> {
        let response = self
            .client
            .post(format!("{}/invoke", self.base_url))
            .json(task)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.failed(format!("HTTP {status}")));
        }

        Ok(response.json::<Value>().await?)
    }

    async fn ping(&self) -> OrchestratorResult<()> {
        let response = self.client.get(format!("{}/health", self.base_url)).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.failed(format!("health check returned HTTP {}", response.status())))
        }
    }
}

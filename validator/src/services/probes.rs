//! Concrete probes
//!
//! Network probes share one `reqwest::Client`; its own timeout is a
//! backstop, the engine's per-probe timeout is authoritative.

use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use url::Url;

use shared::{AgentState, AgentStatus};

use crate::core::{Catalog, CatalogConfig, ProbeConfig, ProbeKind};
use crate::error::{ValidatorError, ValidatorResult};
use crate::traits::Probe;
use crate::types::ProbeOutcome;

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// GET an endpoint and compare the status code
pub struct HttpProbe {
    client: reqwest::Client,
    url: Url,
    expect_status: u16,
}

impl HttpProbe {
    pub fn new(client: reqwest::Client, url: Url, expect_status: u16) -> Self {
        Self {
            client,
            url,
            expect_status,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self) -> ValidatorResult<ProbeOutcome> {
        let started = Instant::now();
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status().as_u16();

        Ok(ProbeOutcome::from_bool(status == self.expect_status).with_detail(json!({
            "status_code": status,
            "elapsed_ms": elapsed_ms(started.elapsed()),
        })))
    }
}

/// GET an endpoint and require a success status within a time budget
pub struct LatencyProbe {
    client: reqwest::Client,
    url: Url,
    max_latency: Duration,
}

impl LatencyProbe {
    pub fn new(client: reqwest::Client, url: Url, max_latency: Duration) -> Self {
        Self {
            client,
            url,
            max_latency,
        }
    }
}

#[async_trait]
impl Probe for LatencyProbe {
    async fn check(&self) -> ValidatorResult<ProbeOutcome> {
        let started = Instant::now();
        let response = self.client.get(self.url.clone()).send().await?;
        let elapsed = started.elapsed();
        let fast_enough = elapsed <= self.max_latency;

        Ok(
            ProbeOutcome::from_bool(response.status().is_success() && fast_enough).with_detail(json!({
                "status_code": response.status().as_u16(),
                "elapsed_ms": elapsed_ms(elapsed),
                "max_ms": elapsed_ms(self.max_latency),
            })),
        )
    }
}

/// Open a TCP connection
pub struct TcpProbe {
    address: String,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into() }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn check(&self) -> ValidatorResult<ProbeOutcome> {
        let started = Instant::now();
        TcpStream::connect(&self.address).await?;

        Ok(ProbeOutcome::pass().with_detail(json!({
            "address": self.address,
            "elapsed_ms": elapsed_ms(started.elapsed()),
        })))
    }
}

/// Environment variable is set and non-empty. The value is never reported.
pub struct EnvProbe {
    variable: String,
}

impl EnvProbe {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

#[async_trait]
impl Probe for EnvProbe {
    async fn check(&self) -> ValidatorResult<ProbeOutcome> {
        let present = std::env::var(&self.variable)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);

        Ok(ProbeOutcome::from_bool(present).with_detail(json!({
            "variable": self.variable,
            "present": present,
        })))
    }
}

/// Read the orchestrator's agent table and require one agent to be active
pub struct AgentProbe {
    client: reqwest::Client,
    status_url: Url,
    agent: String,
}

impl AgentProbe {
    pub fn new(client: reqwest::Client, status_url: Url, agent: impl Into<String>) -> Self {
        Self {
            client,
            status_url,
            agent: agent.into(),
        }
    }
}

#[async_trait]
impl Probe for AgentProbe {
    async fn check(&self) -> ValidatorResult<ProbeOutcome> {
        let body = self
            .client
            .get(self.status_url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let agents: BTreeMap<String, AgentStatus> = serde_json::from_slice(&body)
            .map_err(|e| ValidatorError::probe(&self.agent, format!("malformed agent status table: {e}")))?;

        let outcome = match agents.get(&self.agent) {
            Some(status) => ProbeOutcome::from_bool(status.status == AgentState::Active).with_detail(json!({
                "agent": self.agent,
                "status": status.status,
                "requests": status.requests,
                "failures": status.failures,
            })),
            None => ProbeOutcome::fail().with_detail(json!({
                "agent": self.agent,
                "status": "missing",
            })),
        };
        Ok(outcome)
    }
}

fn parse_url(probe: &str, raw: &str) -> ValidatorResult<Url> {
    Url::parse(raw).map_err(|e| ValidatorError::config(format!("probes.{probe}"), format!("invalid URL {raw}: {e}")))
}

/// `host:port` to connect to, from either `host:port` or a URL
pub fn tcp_address(probe: &str, raw: &str) -> ValidatorResult<String> {
    if raw.contains("://") {
        let url = parse_url(probe, raw)?;
        let host = url
            .host_str()
            .ok_or_else(|| ValidatorError::config(format!("probes.{probe}"), format!("{raw} has no host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ValidatorError::config(format!("probes.{probe}"), format!("{raw} has no port")))?;
        return Ok(format!("{host}:{port}"));
    }

    match raw.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(raw.to_string()),
        _ => Err(ValidatorError::config(
            format!("probes.{probe}"),
            format!("expected host:port or a URL, got {raw}"),
        )),
    }
}

/// Turn one probe description into a live probe
pub fn build_probe(config: &ProbeConfig, client: &reqwest::Client) -> ValidatorResult<Arc<dyn Probe>> {
    let name = config.name.as_str();
    let probe: Arc<dyn Probe> = match &config.kind {
        ProbeKind::Http { url, expect_status } => {
            Arc::new(HttpProbe::new(client.clone(), parse_url(name, url)?, *expect_status))
        }
        ProbeKind::Latency { url, max_millis } => Arc::new(LatencyProbe::new(
            client.clone(),
            parse_url(name, url)?,
            Duration::from_millis(*max_millis),
        )),
        ProbeKind::Tcp { address } => Arc::new(TcpProbe::new(tcp_address(name, address)?)),
        ProbeKind::Env { variable } => {
            if variable.trim().is_empty() {
                return Err(ValidatorError::config(format!("probes.{name}"), "empty variable name"));
            }
            Arc::new(EnvProbe::new(variable.clone()))
        }
        ProbeKind::Agent { status_url, agent } => Arc::new(AgentProbe::new(
            client.clone(),
            parse_url(name, status_url)?,
            agent.clone(),
        )),
    };
    Ok(probe)
}

/// Build a runnable catalog with live probes
pub fn build_catalog(config: &CatalogConfig, client: &reqwest::Client) -> ValidatorResult<Catalog> {
    config.build(|probe| build_probe(probe, client))
}

//! Probe catalog
//!
//! The catalog is the ordered list of component groups a run covers. Each
//! group carries its probes, its weight in the overall score, the success
//! rate it must reach to pass and the remediation hint shown when it fails.
//! [`CatalogConfig`] is the serializable description (file or built-in);
//! [`Catalog`] is the validated, runnable form holding live probes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::recommendations;
use crate::error::{ValidatorError, ValidatorResult};
use crate::traits::Probe;

/// Allowed drift of the weight sum from 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Threshold used when a catalog file omits one
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// A named probe inside a component
#[derive(Clone)]
pub struct ProbeSpec {
    pub name: String,
    pub probe: Arc<dyn Probe>,
}

/// One component group of the catalog
#[derive(Clone)]
pub struct ComponentSpec {
    pub name: String,
    pub weight: f64,
    pub threshold: f64,
    pub recommendation: String,
    pub probes: Vec<ProbeSpec>,
}

impl ComponentSpec {
    /// New component with the stock remediation hint for `name`
    pub fn new(name: impl Into<String>, weight: f64, threshold: f64) -> Self {
        let name = name.into();
        let recommendation = recommendations::default_for(&name);
        Self {
            name,
            weight,
            threshold,
            recommendation,
            probes: Vec::new(),
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    pub fn with_probe(mut self, name: impl Into<String>, probe: Arc<dyn Probe>) -> Self {
        self.probes.push(ProbeSpec {
            name: name.into(),
            probe,
        });
        self
    }
}

impl std::fmt::Debug for ComponentSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSpec")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("threshold", &self.threshold)
            .field("probes", &self.probes.iter().map(|p| p.name.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

/// Validated, ordered component catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    components: Vec<ComponentSpec>,
}

impl Catalog {
    /// Validate and build a catalog. Weights are never normalized: a sum
    /// other than 1.0 is rejected.
    pub fn new(components: Vec<ComponentSpec>) -> ValidatorResult<Self> {
        if components.is_empty() {
            return Err(ValidatorError::config("catalog", "no components declared"));
        }

        let mut names = HashSet::new();
        for component in &components {
            if component.name.trim().is_empty() {
                return Err(ValidatorError::config("catalog", "component with empty name"));
            }
            if !names.insert(component.name.as_str()) {
                return Err(ValidatorError::config(
                    format!("components.{}", component.name),
                    "component declared twice",
                ));
            }
            if !component.weight.is_finite() || component.weight < 0.0 {
                return Err(ValidatorError::config(
                    format!("components.{}.weight", component.name),
                    format!("weight {} must be a non-negative number", component.weight),
                ));
            }
            if !(0.0..=100.0).contains(&component.threshold) {
                return Err(ValidatorError::config(
                    format!("components.{}.threshold", component.name),
                    format!("threshold {} must lie within 0..=100", component.threshold),
                ));
            }

            let mut probe_names = HashSet::new();
            for probe in &component.probes {
                if !probe_names.insert(probe.name.as_str()) {
                    return Err(ValidatorError::config(
                        format!("components.{}.probes", component.name),
                        format!("probe {} declared twice", probe.name),
                    ));
                }
            }
        }

        let sum: f64 = components.iter().map(|component| component.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ValidatorError::config(
                "weights",
                format!("component weights sum to {sum}, expected 1.0"),
            ));
        }

        Ok(Self { components })
    }

    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|component| component.name == name)
    }

    pub fn probe_count(&self) -> usize {
        self.components.iter().map(|component| component.probes.len()).sum()
    }
}

/// Serializable catalog description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub components: Vec<ComponentConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    pub weight: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Falls back to the stock hint for the component name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub probes: Vec<ProbeConfig>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: ProbeKind,
}

/// What a probe checks, tagged by `kind` in catalog files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeKind {
    /// GET `url`, pass on the expected status code
    Http {
        url: String,
        #[serde(default = "default_expect_status")]
        expect_status: u16,
    },
    /// GET `url`, pass when a success status arrives within `max_millis`
    Latency { url: String, max_millis: u64 },
    /// Open a TCP connection to `host:port` or to the host of a URL
    Tcp { address: String },
    /// Environment variable is set and non-empty
    Env { variable: String },
    /// Named agent reports `active` in an orchestrator agents-status payload
    Agent { status_url: String, agent: String },
}

fn default_expect_status() -> u16 {
    200
}

impl ProbeConfig {
    pub fn new(name: impl Into<String>, kind: ProbeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Endpoints the built-in catalog probes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Public API of the platform
    pub base_url: String,
    pub orchestrator_url: String,
    pub vault_url: String,
    pub s3_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            orchestrator_url: "http://localhost:8003".to_string(),
            vault_url: "http://localhost:8200".to_string(),
            s3_url: "https://s3.amazonaws.com".to_string(),
        }
    }
}

/// Join a base URL and an absolute path without doubling the slash
fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

impl CatalogConfig {
    pub fn from_json(text: &str) -> ValidatorResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ValidatorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ValidatorError::config("catalog", format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// The platform's standard eight-component catalog
    pub fn builtin(endpoints: &Endpoints) -> Self {
        let base = endpoints.base_url.as_str();
        let orchestrator = endpoints.orchestrator_url.as_str();
        let vault = endpoints.vault_url.as_str();
        let agents_status = join(orchestrator, "/api/v1/agents/status");

        let http = |url: String| ProbeKind::Http { url, expect_status: 200 };
        let env = |variable: &str| ProbeKind::Env {
            variable: variable.to_string(),
        };
        let agent = |name: &str| ProbeKind::Agent {
            status_url: agents_status.clone(),
            agent: name.to_string(),
        };
        let component = |name: &str, weight: f64, threshold: f64, probes: Vec<ProbeConfig>| ComponentConfig {
            name: name.to_string(),
            weight,
            threshold,
            recommendation: None,
            probes,
        };

        let components = vec![
            component(
                "archer_orchestrator",
                0.25,
                80.0,
                vec![
                    ProbeConfig::new("orchestrator_active", http(join(orchestrator, "/health"))),
                    ProbeConfig::new("system_status", http(join(orchestrator, "/api/v1/system/status"))),
                    ProbeConfig::new("agent_coordination", http(agents_status.clone())),
                    ProbeConfig::new(
                        "orchestrator_port",
                        ProbeKind::Tcp {
                            address: orchestrator.to_string(),
                        },
                    ),
                ],
            ),
            component(
                "ai_agents",
                0.20,
                80.0,
                ["huraii", "cloe", "horace", "thorius"]
                    .into_iter()
                    .map(|name| ProbeConfig::new(name, agent(name)))
                    .collect(),
            ),
            component(
                "runpod_vault",
                0.20,
                80.0,
                vec![
                    ProbeConfig::new("vault_configured", env("RUNPOD_API_KEY")),
                    ProbeConfig::new(
                        "api_connectivity",
                        ProbeKind::Tcp {
                            address: vault.to_string(),
                        },
                    ),
                    ProbeConfig::new("seed_art_endpoint", http(join(vault, "/vault/v1/secret-sauce/seed-art"))),
                    ProbeConfig::new("zodiac_endpoint", http(join(vault, "/vault/v1/secret-sauce/zodiac"))),
                    ProbeConfig::new(
                        "orchestration_endpoint",
                        http(join(vault, "/vault/v1/secret-sauce/orchestrate")),
                    ),
                    ProbeConfig::new("real_time_sync", http(join(vault, "/vault/v1/sync/realtime"))),
                ],
            ),
            component(
                "s3_integration",
                0.15,
                85.0,
                vec![
                    ProbeConfig::new("credentials_configured", env("AWS_ACCESS_KEY_ID")),
                    ProbeConfig::new("secret_configured", env("AWS_SECRET_ACCESS_KEY")),
                    ProbeConfig::new("bucket_configured", env("AWS_S3_BUCKET")),
                    ProbeConfig::new(
                        "bucket_access",
                        ProbeKind::Tcp {
                            address: endpoints.s3_url.clone(),
                        },
                    ),
                ],
            ),
            component(
                "tola_art_automation",
                0.10,
                80.0,
                vec![
                    ProbeConfig::new("daily_generation", http(join(base, "/api/v1/tola-art/status"))),
                    ProbeConfig::new("huraii_integration", agent("huraii")),
                ],
            ),
            component(
                "error_recovery",
                0.05,
                75.0,
                vec![
                    ProbeConfig::new("automation_health", http(join(base, "/api/v1/automation/health"))),
                    ProbeConfig::new("orchestrator_recovery", http(join(orchestrator, "/health"))),
                ],
            ),
            component(
                "api_endpoints",
                0.03,
                80.0,
                [
                    ("health", "/health"),
                    ("agents_status", "/api/v1/agents/status"),
                    ("system_status", "/api/v1/system/status"),
                    ("tola_art_status", "/api/v1/tola-art/status"),
                    ("automation_health", "/api/v1/automation/health"),
                ]
                .into_iter()
                .map(|(name, path)| ProbeConfig::new(name, http(join(base, path))))
                .collect(),
            ),
            component(
                "performance",
                0.02,
                80.0,
                vec![
                    ProbeConfig::new(
                        "response_time",
                        ProbeKind::Latency {
                            url: join(base, "/health"),
                            max_millis: 500,
                        },
                    ),
                    ProbeConfig::new(
                        "orchestrator_response_time",
                        ProbeKind::Latency {
                            url: join(orchestrator, "/api/v1/system/status"),
                            max_millis: 500,
                        },
                    ),
                ],
            ),
        ];

        Self { components }
    }

    /// Build the runnable catalog, turning each probe description into a live probe
    pub fn build<F>(&self, mut make_probe: F) -> ValidatorResult<Catalog>
    where
        F: FnMut(&ProbeConfig) -> ValidatorResult<Arc<dyn Probe>>,
    {
        let mut components = Vec::with_capacity(self.components.len());
        for config in &self.components {
            let mut component = ComponentSpec::new(&config.name, config.weight, config.threshold);
            if let Some(recommendation) = &config.recommendation {
                component = component.with_recommendation(recommendation);
            }
            for probe in &config.probes {
                component = component.with_probe(&probe.name, make_probe(probe)?);
            }
            components.push(component);
        }
        Catalog::new(components)
    }
}

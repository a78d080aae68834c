//! Core types used throughout the orchestration and validation services

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::{SharedError, SharedResult};

/// Global service ID singleton - set once at startup
static SERVICE_ID: OnceLock<ServiceId> = OnceLock::new();

/// Identifier for the running service, stamped on every log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceId {
    /// Task orchestration service (dispatcher + registry)
    Orchestrator,
    /// System-health validation run
    Validator,
}

impl ServiceId {
    /// Initialize the global service ID for the orchestrator
    pub fn init_orchestrator() -> &'static ServiceId {
        SERVICE_ID.get_or_init(|| ServiceId::Orchestrator)
    }

    /// Initialize the global service ID for the validator
    pub fn init_validator() -> &'static ServiceId {
        SERVICE_ID.get_or_init(|| ServiceId::Validator)
    }

    /// Get the global service ID.
    ///
    /// Library code may run before a binary has initialized the singleton
    /// (tests, embedding), so this falls back to the orchestrator identity
    /// instead of panicking.
    pub fn current() -> &'static ServiceId {
        SERVICE_ID.get().unwrap_or(&ServiceId::Orchestrator)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Orchestrator => write!(f, "orchestrator"),
            ServiceId::Validator => write!(f, "validator"),
        }
    }
}

/// Kinds of work the orchestrator knows how to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ArtGeneration,
    MarketAnalysis,
    ContentOptimization,
    /// Anything the submitter sent that is not a registered type
    Unknown,
}

impl TaskType {
    /// Every routable task type, in declaration order
    pub const ROUTABLE: [TaskType; 3] = [
        TaskType::ArtGeneration,
        TaskType::MarketAnalysis,
        TaskType::ContentOptimization,
    ];

    /// Parse a submitted type string. Never fails: unrecognized input maps to `Unknown`.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "art_generation" => TaskType::ArtGeneration,
            "market_analysis" => TaskType::MarketAnalysis,
            "content_optimization" => TaskType::ContentOptimization,
            _ => TaskType::Unknown,
        }
    }

    /// Prefix used for orchestration ids (`ART_1700000000`)
    pub fn id_prefix(&self) -> &'static str {
        match self {
            TaskType::ArtGeneration => "ART",
            TaskType::MarketAnalysis => "MKT",
            TaskType::ContentOptimization => "CNT",
            TaskType::Unknown => "UNK",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::ArtGeneration => "art_generation",
            TaskType::MarketAnalysis => "market_analysis",
            TaskType::ContentOptimization => "content_optimization",
            TaskType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work submitted for orchestration. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "type")]
    task_type: TaskType,
    description: String,
    submitted_at: DateTime<Utc>,
}

impl Task {
    pub fn new(task_type: TaskType, description: impl Into<String>) -> Self {
        Self::with_timestamp(task_type, description, Utc::now())
    }

    pub fn with_timestamp(task_type: TaskType, description: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            task_type,
            description: description.into(),
            submitted_at,
        }
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Hardware class an agent runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwareClass {
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "CPU")]
    Cpu,
}

impl fmt::Display for HardwareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareClass::Gpu => write!(f, "GPU"),
            HardwareClass::Cpu => write!(f, "CPU"),
        }
    }
}

impl FromStr for HardwareClass {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GPU" => Ok(HardwareClass::Gpu),
            "CPU" => Ok(HardwareClass::Cpu),
            _ => Err(SharedError::UnknownHardwareClass { input: s.to_string() }),
        }
    }
}

/// Liveness of a registered agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Active,
    Degraded,
    Offline,
}

impl AgentState {
    /// Compact encoding used for lock-free storage
    pub fn as_u8(self) -> u8 {
        match self {
            AgentState::Active => 0,
            AgentState::Degraded => 1,
            AgentState::Offline => 2,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => AgentState::Active,
            1 => AgentState::Degraded,
            _ => AgentState::Offline,
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentState::Active => write!(f, "active"),
            AgentState::Degraded => write!(f, "degraded"),
            AgentState::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for AgentState {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AgentState::Active),
            "degraded" => Ok(AgentState::Degraded),
            "offline" => Ok(AgentState::Offline),
            _ => Err(SharedError::UnknownAgentState { input: s.to_string() }),
        }
    }
}

/// Declared identity of an agent: what it is called, where it listens, what it runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub hardware_class: HardwareClass,
    pub listen_port: u16,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, hardware_class: HardwareClass, listen_port: u16) -> Self {
        Self {
            name: name.into(),
            hardware_class,
            listen_port,
        }
    }

    /// The agents the platform ships with
    pub fn defaults() -> Vec<AgentSpec> {
        vec![
            AgentSpec::new("huraii", HardwareClass::Gpu, 7860),
            AgentSpec::new("cloe", HardwareClass::Cpu, 8000),
            AgentSpec::new("horace", HardwareClass::Cpu, 8001),
            AgentSpec::new("thorius", HardwareClass::Cpu, 8002),
        ]
    }
}

impl FromStr for AgentSpec {
    type Err = SharedError;

    /// Parse `name:HW:port`, e.g. `huraii:GPU:7860`
    fn from_str(s: &str) -> SharedResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [name, hardware, port] = parts.as_slice() else {
            return Err(SharedError::MalformedAgentSpec { input: s.to_string() });
        };

        if name.trim().is_empty() {
            return Err(SharedError::MalformedAgentSpec { input: s.to_string() });
        }

        let listen_port = port.parse::<u16>().map_err(|_| SharedError::InvalidConfig {
            field: "listen_port".to_string(),
            value: port.to_string(),
        })?;

        Ok(AgentSpec::new(name.trim(), hardware.parse()?, listen_port))
    }
}

/// Point-in-time view of one registered agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub name: String,
    #[serde(rename = "hardware")]
    pub hardware_class: HardwareClass,
    #[serde(rename = "port")]
    pub listen_port: u16,
    pub status: AgentState,
    #[serde(default)]
    pub requests: u64,
    #[serde(default)]
    pub successes: u64,
    #[serde(default)]
    pub failures: u64,
}

//! Agent registry with live status counters
//!
//! The set of registered agents is fixed once the registry is shared
//! (`Arc<AgentRegistry>`); after that only per-agent atomics change, so
//! readers and writers never contend on a lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use shared::{service_debug, service_warn, AgentSpec, AgentState, AgentStatus, HardwareAllocation, HardwareClass, ServiceId};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::Capability;

/// Consecutive failures after which an agent is considered offline
pub const OFFLINE_AFTER_CONSECUTIVE_FAILURES: u32 = 3;

/// A registered agent and its live counters
struct AgentEntry {
    spec: AgentSpec,
    capability: Arc<dyn Capability>,
    state: AtomicU8,
    requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    consecutive_failures: AtomicU32,
}

impl AgentEntry {
    fn new(spec: AgentSpec, capability: Arc<dyn Capability>) -> Self {
        Self {
            spec,
            capability,
            state: AtomicU8::new(AgentState::Active.as_u8()),
            requests: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    fn state(&self) -> AgentState {
        AgentState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn mark_healthy(&self) {
        self.consecutive_failures.store(0, Ordering::Release);
        self.state.store(AgentState::Active.as_u8(), Ordering::Release);
    }

    fn mark_unhealthy(&self) -> AgentState {
        let streak = self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1;
        let next = if streak >= OFFLINE_AFTER_CONSECUTIVE_FAILURES {
            AgentState::Offline
        } else {
            AgentState::Degraded
        };
        self.state.store(next.as_u8(), Ordering::Release);
        next
    }

    fn status(&self) -> AgentStatus {
        AgentStatus {
            name: self.spec.name.clone(),
            hardware_class: self.spec.hardware_class,
            listen_port: self.spec.listen_port,
            status: self.state(),
            requests: self.requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Declared capabilities, their hardware class and live counters
#[derive(Default)]
pub struct AgentRegistry {
    entries: Vec<AgentEntry>,
    index: HashMap<String, usize>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under its agent declaration.
    ///
    /// Registration happens at startup only; a duplicate name is a configuration error.
    pub fn register(&mut self, spec: AgentSpec, capability: Arc<dyn Capability>) -> OrchestratorResult<()> {
        if self.index.contains_key(&spec.name) {
            return Err(OrchestratorError::DuplicateCapability { name: spec.name });
        }

        service_debug!(
            ServiceId::current(),
            "🧩 Registered capability {} ({}, port {})",
            spec.name,
            spec.hardware_class,
            spec.listen_port
        );

        self.index.insert(spec.name.clone(), self.entries.len());
        self.entries.push(AgentEntry::new(spec, capability));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.spec.name.as_str())
    }

    fn entry(&self, name: &str) -> Option<&AgentEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Handle to the capability endpoint registered under `name`
    pub fn capability(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.entry(name).map(|entry| Arc::clone(&entry.capability))
    }

    pub fn get_status(&self, name: &str) -> Option<AgentStatus> {
        self.entry(name).map(AgentEntry::status)
    }

    /// Status of every registered agent keyed by name
    pub fn snapshot(&self) -> BTreeMap<String, AgentStatus> {
        self.entries
            .iter()
            .map(|entry| (entry.spec.name.clone(), entry.status()))
            .collect()
    }

    /// Count a successful invocation and mark the agent active
    pub fn record_success(&self, name: &str) {
        if let Some(entry) = self.entry(name) {
            entry.requests.fetch_add(1, Ordering::Relaxed);
            entry.successes.fetch_add(1, Ordering::Relaxed);
            entry.mark_healthy();
        }
    }

    /// Count a failed invocation and degrade the agent
    pub fn record_failure(&self, name: &str) {
        if let Some(entry) = self.entry(name) {
            entry.requests.fetch_add(1, Ordering::Relaxed);
            entry.failures.fetch_add(1, Ordering::Relaxed);
            let state = entry.mark_unhealthy();
            if state == AgentState::Offline {
                service_warn!(ServiceId::current(), "📴 Agent {} marked offline", name);
            }
        }
    }

    /// Apply a heartbeat outcome without touching request counters
    pub fn record_heartbeat(&self, name: &str, reachable: bool) -> Option<AgentState> {
        let entry = self.entry(name)?;
        if reachable {
            entry.mark_healthy();
            Some(AgentState::Active)
        } else {
            Some(entry.mark_unhealthy())
        }
    }

    pub fn hardware_allocation(&self) -> HardwareAllocation {
        self.entries
            .iter()
            .fold(HardwareAllocation::default(), |mut allocation, entry| {
                match entry.spec.hardware_class {
                    HardwareClass::Gpu => allocation.gpu_agents += 1,
                    HardwareClass::Cpu => allocation.cpu_agents += 1,
                }
                allocation
            })
    }

    /// `operational` when every agent is active, `offline` when every agent is offline, `degraded` otherwise
    pub fn system_status(&self) -> &'static str {
        let count = |wanted: AgentState| self.entries.iter().filter(|entry| entry.state() == wanted).count();

        if self.entries.is_empty() || count(AgentState::Offline) == self.entries.len() {
            "offline"
        } else if count(AgentState::Active) == self.entries.len() {
            "operational"
        } else {
            "degraded"
        }
    }
}

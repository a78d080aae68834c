//! Validation result types

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::core::grading::{round_score, serialize_rounded, serialize_rounded_opt};

/// What a probe reports about one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ProbeOutcome {
    pub fn pass() -> Self {
        Self { passed: true, detail: None }
    }

    pub fn fail() -> Self {
        Self { passed: false, detail: None }
    }

    pub fn from_bool(passed: bool) -> Self {
        Self { passed, detail: None }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Outcome of one probe invocation within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "name")]
    pub probe_name: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ProbeResult {
    pub fn from_outcome(probe_name: impl Into<String>, outcome: ProbeOutcome) -> Self {
        Self {
            probe_name: probe_name.into(),
            passed: outcome.passed,
            detail: outcome.detail,
        }
    }

    /// A probe that errored, timed out or panicked
    pub fn failed(probe_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            probe_name: probe_name.into(),
            passed: false,
            detail: Some(json!({ "error": error.into() })),
        }
    }
}

/// Pass/fail verdict of a component against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentStatus {
    Pass,
    Fail,
}

impl ComponentStatus {
    /// `Pass` iff `score >= threshold`
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            ComponentStatus::Pass
        } else {
            ComponentStatus::Fail
        }
    }

    pub fn is_fail(&self) -> bool {
        *self == ComponentStatus::Fail
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Pass => "PASS",
            ComponentStatus::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated result of one component group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentValidation {
    /// Key of the entry in the report's `components` map
    #[serde(skip)]
    pub component_name: String,
    /// Percentage of completed probes that passed, exact; serialized with
    /// one decimal. `None` when no probe completed.
    #[serde(serialize_with = "serialize_rounded_opt")]
    pub success_rate: Option<f64>,
    /// Value that entered the weighted score and the status comparison
    #[serde(serialize_with = "serialize_rounded")]
    pub score: f64,
    pub weight: f64,
    pub threshold: f64,
    pub status: ComponentStatus,
    pub probes: Vec<ProbeResult>,
    /// Probes cancelled at the run deadline; they count neither way
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_probes: Vec<String>,
}

impl ComponentValidation {
    pub fn passed_probes(&self) -> usize {
        self.probes.iter().filter(|probe| probe.passed).count()
    }

    /// Success rate at reporting precision
    pub fn reported_rate(&self) -> Option<f64> {
        self.success_rate.map(round_score)
    }

    pub fn is_defaulted(&self) -> bool {
        self.success_rate.is_none()
    }

    pub fn probe(&self, name: &str) -> Option<&ProbeResult> {
        self.probes.iter().find(|probe| probe.probe_name == name)
    }
}

/// Component results in catalog order, serialized as a name-keyed map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentResults(Vec<ComponentValidation>);

impl ComponentResults {
    pub fn new(components: Vec<ComponentValidation>) -> Self {
        Self(components)
    }

    pub fn get(&self, name: &str) -> Option<&ComponentValidation> {
        self.0.iter().find(|component| component.component_name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentValidation> {
        self.0.iter()
    }

    pub fn failing(&self) -> impl Iterator<Item = &ComponentValidation> {
        self.0.iter().filter(|component| component.status == ComponentStatus::Fail)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ComponentResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for component in &self.0 {
            map.serialize_entry(&component.component_name, component)?;
        }
        map.end()
    }
}

//! Validation report
//!
//! The JSON form of [`ValidationReport`] is the persisted artifact other
//! tooling reads; its top-level keys are fixed. The textual summary is
//! rendered from the same value and never touches a probe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::grading::{classify, round_score, serialize_rounded, Grade, HealthStatus};
use super::{recommendations, Catalog};
use crate::types::ComponentResults;

/// Overall score with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallHealth {
    /// Weighted score, exact; serialized with one decimal
    #[serde(serialize_with = "serialize_rounded")]
    pub overall_score: f64,
    pub status: HealthStatus,
    pub grade: Grade,
}

impl OverallHealth {
    /// Classify the exact weighted score
    pub fn from_score(overall_score: f64) -> Self {
        let (status, grade) = classify(overall_score);
        Self {
            overall_score,
            status,
            grade,
        }
    }

    /// Score at reporting precision
    pub fn reported_score(&self) -> f64 {
        round_score(self.overall_score)
    }
}

/// Result of one validation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// RFC 3339 start time
    pub timestamp: String,
    /// `VAL_<unix seconds>`
    pub validation_id: String,
    pub components: ComponentResults,
    pub overall_health: OverallHealth,
    pub recommendations: Vec<String>,
    /// Seconds
    pub validation_duration: f64,
    #[serde(skip)]
    started_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Assemble the report from finished component results
    pub fn build(
        catalog: &Catalog,
        components: ComponentResults,
        overall_health: OverallHealth,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let recommendations = recommendations::generate(catalog, &components);
        Self {
            timestamp: started_at.to_rfc3339(),
            validation_id: format!("VAL_{}", started_at.timestamp()),
            components,
            overall_health,
            recommendations,
            validation_duration: duration.as_secs_f64(),
            started_at,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary of the report
    pub fn render_summary(&self) -> String {
        Summary(self).to_string()
    }
}

const RULE: &str = "================================================================";

struct Summary<'a>(&'a ValidationReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let health = &report.overall_health;

        writeln!(f, "🚀 VORTEX AI ENGINE - AUTOMATION VALIDATION REPORT")?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "📊 OVERALL SYSTEM HEALTH")?;
        writeln!(f, "Overall Score: {:.1}% ({})", health.overall_score, health.grade)?;
        writeln!(f, "Status: {}", health.status)?;
        writeln!(f, "Validation Duration: {:.2} seconds", report.validation_duration)?;
        writeln!(f, "Timestamp: {}", report.timestamp)?;
        writeln!(f, "Validation ID: {}", report.validation_id)?;
        writeln!(f)?;
        writeln!(f, "📋 COMPONENT BREAKDOWN")?;
        writeln!(f, "{RULE}")?;

        for component in report.components.iter() {
            writeln!(f)?;
            match component.success_rate {
                Some(rate) => writeln!(
                    f,
                    "{}: {:.1}% ({}) - {}/{} probes passed",
                    component.component_name,
                    rate,
                    component.status,
                    component.passed_probes(),
                    component.probes.len()
                )?,
                None => writeln!(
                    f,
                    "{}: no data, defaulted to {:.1}% ({})",
                    component.component_name, component.score, component.status
                )?,
            }
            for probe in &component.probes {
                let mark = if probe.passed { "✓" } else { "❌" };
                writeln!(f, "   - {}: {}", probe.probe_name, mark)?;
            }
            for skipped in &component.skipped_probes {
                writeln!(f, "   - {}: skipped", skipped)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "🔧 RECOMMENDATIONS")?;
        writeln!(f, "{RULE}")?;
        for (i, recommendation) in report.recommendations.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, recommendation)?;
        }

        writeln!(f)?;
        writeln!(f, "📈 NEXT STEPS")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "1. Address any failing components above")?;
        writeln!(f, "2. Implement recommended optimizations")?;
        writeln!(f, "3. Schedule regular validation checks")?;
        writeln!(f, "4. Monitor system health continuously")?;
        writeln!(f, "5. Update automation configurations as needed")?;
        writeln!(f)?;
        writeln!(f, "Generated by VORTEX Automation Validator v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(f, "{RULE}")
    }
}

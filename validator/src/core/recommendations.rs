//! Remediation hints for failing components

use crate::types::ComponentResults;

use super::Catalog;

/// Emitted alone when no component fails
pub const ALL_CLEAR: &str = "🎉 All systems are functioning optimally!";

/// Stock hint for the platform's component names, generic otherwise
pub fn default_for(component: &str) -> String {
    let hint = match component {
        "archer_orchestrator" => "🎯 ARCHER Orchestrator: Verify class loading and sync scheduling",
        "ai_agents" => "🤖 AI Agents: Check agent initialization and heartbeat systems",
        "runpod_vault" => "🔒 RunPod Vault: Verify API credentials and endpoint configuration",
        "s3_integration" => "☁️ S3 Integration: Check AWS credentials and bucket permissions",
        "tola_art_automation" => "🎨 TOLA-ART: Verify daily scheduling and database tables",
        "error_recovery" => "🛡️ Error Recovery: Implement enhanced retry mechanisms",
        "api_endpoints" => "🌐 API Endpoints: Check endpoint availability and routing",
        "performance" => "⚡ Performance: Optimize response times and resource usage",
        other => return format!("🔧 {other}: Investigate the failing probes"),
    };
    hint.to_string()
}

/// One hint per failing component, in catalog order
pub fn generate(catalog: &Catalog, components: &ComponentResults) -> Vec<String> {
    let mut hints: Vec<String> = catalog
        .components()
        .iter()
        .filter(|spec| components.get(&spec.name).is_some_and(|result| result.status.is_fail()))
        .map(|spec| spec.recommendation.clone())
        .collect();

    if hints.is_empty() {
        hints.push(ALL_CLEAR.to_string());
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ComponentSpec;
    use crate::types::{ComponentStatus, ComponentValidation};

    fn result(name: &str, status: ComponentStatus) -> ComponentValidation {
        ComponentValidation {
            component_name: name.to_string(),
            success_rate: Some(50.0),
            score: 50.0,
            weight: 0.5,
            threshold: 80.0,
            status,
            probes: vec![],
            skipped_probes: vec![],
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            ComponentSpec::new("performance", 0.5, 80.0),
            ComponentSpec::new("ai_agents", 0.3, 80.0),
            ComponentSpec::new("custom", 0.2, 80.0).with_recommendation("Restart the custom worker"),
        ])
        .unwrap()
    }

    #[test]
    fn test_hints_follow_catalog_order() {
        // Results deliberately listed out of catalog order
        let components = ComponentResults::new(vec![
            result("custom", ComponentStatus::Fail),
            result("ai_agents", ComponentStatus::Pass),
            result("performance", ComponentStatus::Fail),
        ]);

        assert_eq!(
            generate(&catalog(), &components),
            vec![
                "⚡ Performance: Optimize response times and resource usage".to_string(),
                "Restart the custom worker".to_string(),
            ]
        );
    }

    #[test]
    fn test_all_clear_when_nothing_fails() {
        let components = ComponentResults::new(vec![
            result("performance", ComponentStatus::Pass),
            result("ai_agents", ComponentStatus::Pass),
            result("custom", ComponentStatus::Pass),
        ]);

        assert_eq!(generate(&catalog(), &components), vec![ALL_CLEAR.to_string()]);
    }

    #[test]
    fn test_unknown_component_gets_generic_hint() {
        assert_eq!(default_for("ledger"), "🔧 ledger: Investigate the failing probes");
        assert!(default_for("runpod_vault").starts_with("🔒 RunPod Vault"));
    }
}

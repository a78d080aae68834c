//! Validator binary entry point
//!
//! Runs the probe catalog once, prints the textual report, persists the JSON
//! and text artifacts and optionally fails when health is below a floor.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use shared::{logging, ServiceId};
use validator::{
    services::{build_catalog, FileReportWriter},
    CatalogConfig, EngineConfig, Endpoints, ReportSink, ValidationEngine, ValidatorError,
};

/// Health validator for the automation platform
#[derive(Parser)]
#[command(name = "validator")]
#[command(about = "Runs health probes and scores overall system health")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON probe catalog; the built-in catalog is used when absent
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory receiving the JSON and text reports
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Public API base URL
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Orchestrator base URL
    #[arg(long, default_value = "http://localhost:8003")]
    orchestrator_url: String,

    /// Vault base URL
    #[arg(long, default_value = "http://localhost:8200")]
    vault_url: String,

    /// Object storage endpoint
    #[arg(long, default_value = "https://s3.amazonaws.com")]
    s3_url: String,

    /// Per-probe timeout in milliseconds
    #[arg(long, default_value = "10000")]
    probe_timeout_ms: u64,

    /// Probes in flight at once
    #[arg(long, default_value = "8")]
    max_concurrency: usize,

    /// Deadline for the whole run in seconds, 0 for none
    #[arg(long, default_value = "60")]
    deadline_secs: u64,

    /// Exit with an error when the overall score is below this value
    #[arg(long)]
    fail_under: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials probed by env probes may live in .env
    let _ = dotenv::dotenv();

    let args = Args::parse();

    ServiceId::init_validator();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ServiceId::current(), "validation run");

    let config = match &args.catalog {
        Some(path) => CatalogConfig::from_file(path).with_context(|| format!("loading catalog {}", path.display()))?,
        None => CatalogConfig::builtin(&Endpoints {
            base_url: args.base_url.clone(),
            orchestrator_url: args.orchestrator_url.clone(),
            vault_url: args.vault_url.clone(),
            s3_url: args.s3_url.clone(),
        }),
    };

    let probe_timeout = Duration::from_millis(args.probe_timeout_ms);
    let client = reqwest::Client::builder()
        .timeout(probe_timeout)
        .build()
        .context("building HTTP client")?;
    let catalog = build_catalog(&config, &client).context("building probe catalog")?;

    let engine = ValidationEngine::new(EngineConfig {
        probe_timeout,
        max_concurrency: args.max_concurrency,
        deadline: (args.deadline_secs > 0).then(|| Duration::from_secs(args.deadline_secs)),
    })?;

    let report = engine.validate(&catalog).await;
    let summary = report.render_summary();
    println!("{summary}");

    let writer = FileReportWriter::new(&args.output);
    writer
        .persist(&report, &summary)
        .await
        .with_context(|| format!("writing reports to {}", args.output.display()))?;

    let failing = report.components.failing().count();
    if failing > 0 {
        logging::log_degraded(
            ServiceId::current(),
            "Validation",
            &format!("{failing} of {} components below threshold", report.components.len()),
        );
    }

    let health = report.overall_health;
    println!(
        "🎯 Overall System Health: {:.1}% ({})",
        health.overall_score, health.status
    );

    if let Some(minimum) = args.fail_under {
        if health.overall_score < minimum {
            return Err(ValidatorError::HealthBelowThreshold {
                score: health.reported_score(),
                minimum,
            }
            .into());
        }
    }

    logging::log_success(ServiceId::current(), &format!("Validation {} finished", report.validation_id));
    Ok(())
}

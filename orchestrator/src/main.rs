//! Main entry point for the orchestrator binary
//!
//! Wires the agent registry, metrics and routing table into a dispatcher,
//! then either dispatches a single task (CLI mode) or serves the HTTP API
//! with a background heartbeat.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use orchestrator::{
    services::{HttpCapability, SimulatedCapability},
    AgentRegistry, Capability, DispatchConfig, OrchestratorError, OrchestratorResult, RoutingTable, SystemMetrics,
    TaskDispatcher,
};
use shared::{logging, service_debug, service_info, AgentSpec, ServiceId, TaskSubmission};

/// Orchestrator for routing tasks across agent capabilities
#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Routes tasks to agent capabilities and reports system status")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// HTTP bind address
    #[arg(long, default_value = "0.0.0.0:8003")]
    pub bind: String,

    /// Host where agent endpoints listen
    #[arg(long, default_value = "127.0.0.1")]
    pub agent_host: String,

    /// Agent declaration `name:HW:port`, repeatable (defaults to the built-in agents)
    #[arg(long = "agent")]
    pub agents: Vec<String>,

    /// Answer with canned payloads instead of calling agent endpoints
    #[arg(long)]
    pub simulate: bool,

    /// Per-capability timeout in milliseconds
    #[arg(long, default_value = "30000")]
    pub capability_timeout_ms: u64,

    /// Capabilities invoked at once within one dispatch
    #[arg(long, default_value = "4")]
    pub max_concurrency: usize,

    /// Seconds between heartbeat sweeps
    #[arg(long, default_value = "5")]
    pub heartbeat_secs: u64,

    /// CLI mode: task type to dispatch once (art_generation, market_analysis, content_optimization)
    #[arg(long)]
    pub task: Option<String>,

    /// CLI mode: task description
    #[arg(long, default_value = "")]
    pub description: String,
}

fn build_registry(args: &Args) -> OrchestratorResult<AgentRegistry> {
    let specs = if args.agents.is_empty() {
        AgentSpec::defaults()
    } else {
        args.agents
            .iter()
            .map(|raw| raw.parse::<AgentSpec>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let client = reqwest::Client::new();
    let mut registry = AgentRegistry::new();
    for spec in specs {
        let capability: Arc<dyn Capability> = if args.simulate {
            Arc::new(SimulatedCapability::new(&spec.name))
        } else {
            Arc::new(HttpCapability::for_agent(&spec, &args.agent_host, client.clone()))
        };
        registry.register(spec, capability)?;
    }
    Ok(registry)
}

#[tokio::main]
async fn main() -> OrchestratorResult<()> {
    let args = Args::parse();

    ServiceId::init_orchestrator();
    logging::init_tracing_with_level(Some(&args.log_level));

    if args.heartbeat_secs == 0 {
        return Err(OrchestratorError::config("heartbeat_secs", "must be greater than zero"));
    }

    let config = DispatchConfig {
        capability_timeout: Duration::from_millis(args.capability_timeout_ms),
        max_concurrency: args.max_concurrency,
        ..DispatchConfig::default()
    };
    let registry = Arc::new(build_registry(&args)?);
    let metrics = Arc::new(SystemMetrics::new());
    let dispatcher = Arc::new(TaskDispatcher::new(registry, metrics, RoutingTable::v1(), config)?);

    service_debug!(
        ServiceId::current(),
        "🧭 Routing table v{} over {} agents{}",
        dispatcher.routing().version(),
        dispatcher.registry().len(),
        if args.simulate { " (simulated)" } else { "" }
    );

    if let Some(task_type) = &args.task {
        service_info!(ServiceId::current(), "🖥️  CLI mode: dispatching {}", task_type);

        let outcome = dispatcher
            .submit(TaskSubmission::new(task_type.clone(), args.description.clone()))
            .await;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        println!("{}", serde_json::to_string_pretty(&dispatcher.system_status())?);
        return Ok(());
    }

    logging::log_startup(ServiceId::current(), "orchestrator service");

    let addr: SocketAddr = args
        .bind
        .parse()
        .map_err(|e| OrchestratorError::config("bind", format!("invalid address {}: {}", args.bind, e)))?;

    let heartbeat_dispatcher = Arc::clone(&dispatcher);
    let heartbeat_every = Duration::from_secs(args.heartbeat_secs);
    let heartbeat = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat_every);
        loop {
            ticker.tick().await;
            heartbeat_dispatcher.heartbeat().await;
        }
    });

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => logging::log_shutdown(ServiceId::current(), "Received Ctrl+C signal"),
            Err(err) => logging::log_error(ServiceId::current(), "Signal handling", &err),
        }
    };

    orchestrator::web::serve(dispatcher, addr, shutdown).await?;
    heartbeat.abort();

    logging::log_success(ServiceId::current(), "Orchestrator stopped gracefully");
    Ok(())
}

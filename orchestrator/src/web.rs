//! HTTP surface for task submission and status queries

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use shared::{service_info, service_warn, AgentStatus, ServiceId, SystemStatusReport, TaskSubmission};

use crate::dispatcher::{DispatchOutcome, TaskDispatcher};
use crate::error::OrchestratorResult;

/// Build the API router around a shared dispatcher
pub fn router(dispatcher: Arc<TaskDispatcher>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/system/status", get(system_status))
        .route("/api/v1/agents/status", get(agents_status))
        .route("/api/v1/orchestrate", post(orchestrate))
        .with_state(dispatcher)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn serve<S>(dispatcher: Arc<TaskDispatcher>, addr: SocketAddr, shutdown: S) -> OrchestratorResult<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    service_info!(ServiceId::current(), "🌐 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn system_status(State(dispatcher): State<Arc<TaskDispatcher>>) -> Json<SystemStatusReport> {
    Json(dispatcher.system_status())
}

async fn agents_status(State(dispatcher): State<Arc<TaskDispatcher>>) -> Json<BTreeMap<String, AgentStatus>> {
    Json(dispatcher.registry().snapshot())
}

/// Unknown task types and undecodable bodies answer 200 with the
/// failed-result shape and count as failed requests
async fn orchestrate(
    State(dispatcher): State<Arc<TaskDispatcher>>,
    body: Result<Json<TaskSubmission>, JsonRejection>,
) -> Json<DispatchOutcome> {
    let submission = match body {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            service_warn!(ServiceId::current(), "🧾 Undecodable submission: {}", rejection.body_text());
            TaskSubmission::default()
        }
    };
    Json(dispatcher.submit(submission).await)
}

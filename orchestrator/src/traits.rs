//! Trait definitions with mockall annotations for testing
//!
//! Capability endpoints are external collaborators. The dispatcher only knows
//! this contract, so production HTTP clients, offline simulations and test
//! doubles are interchangeable.

use serde_json::Value;
use shared::Task;

use crate::error::OrchestratorResult;

/// One unit of domain work (art generation, market analysis, content optimization)
#[mockall::automock]
#[async_trait::async_trait]
pub trait Capability: Send + Sync {
    /// Perform the work for `task` and return the structured result payload.
    ///
    /// An `Err` marks this capability's part of the dispatch as failed.
    async fn invoke(&self, task: &Task) -> OrchestratorResult<Value>;

    /// Cheap liveness check used by the heartbeat loop
    async fn ping(&self) -> OrchestratorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TaskType;

    #[tokio::test]
    async fn test_mock_capability_contract() {
        let mut capability = MockCapability::new();
        capability
            .expect_invoke()
            .returning(|task| Ok(serde_json::json!({ "echo": task.description() })));
        capability.expect_ping().returning(|| Ok(()));

        let task = Task::new(TaskType::MarketAnalysis, "hello");
        let payload = capability.invoke(&task).await.unwrap();

        assert_eq!(payload["echo"], "hello");
        assert!(capability.ping().await.is_ok());
    }
}

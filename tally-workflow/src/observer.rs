use async_trait::async_trait;

use crate::state::ReconciliationState;

/// Stage lifecycle hooks. All methods default to no-ops so observers only
/// implement what they care about.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn on_stage_start(&self, _stage: &str, _state: &ReconciliationState) {}

    async fn on_stage_end(&self, _stage: &str, _state: &ReconciliationState, _duration_ms: u128) {}

    async fn on_error(&self, _stage: &str, _error: &str) {}
}

use async_trait::async_trait;

use crate::state::ReconciliationState;

pub const PARSE_AMOUNTS: &str = "parse_amounts";
pub const COMPARE_AMOUNTS: &str = "compare_amounts";
pub const GENERATE_VERDICT: &str = "generate_verdict";

/// One step of the reconciliation machine.
///
/// A stage never fails the run: internal failures are caught at the stage
/// boundary, recorded into `state.error`, and the mutated state is returned
/// so downstream stages still execute against best-effort values.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, state: ReconciliationState) -> ReconciliationState;
}

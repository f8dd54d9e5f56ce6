use std::sync::Arc;

use tally_trace::TraceStore;
use tally_workflow::{
    ReconciliationWorkflow, WorkflowBuilder, WorkflowError, WorkflowStatus, COMPARE_AMOUNTS,
    GENERATE_VERDICT, PARSE_AMOUNTS,
};

#[tokio::test]
async fn matching_amounts_yield_yes() {
    let workflow = ReconciliationWorkflow::standard();
    let verdict = workflow.run("$500.00", "$500.00").await.unwrap();

    assert!(verdict.contains("RECONCILIATION VERDICT: YES"));
    assert!(verdict.contains("match within acceptable tolerance"));
}

#[tokio::test]
async fn mismatching_amounts_yield_no() {
    let workflow = ReconciliationWorkflow::standard();
    let verdict = workflow.run("$500.00", "$400.00").await.unwrap();

    assert!(verdict.contains("RECONCILIATION VERDICT: NO"));
    assert!(verdict.contains("MISMATCH"));
}

#[tokio::test]
async fn one_percent_difference_is_still_a_match() {
    let workflow = ReconciliationWorkflow::standard();
    let verdict = workflow.run("$100.00", "$99.00").await.unwrap();
    assert!(verdict.contains("RECONCILIATION VERDICT: YES"));
}

#[tokio::test]
async fn unparseable_inputs_yield_inconclusive() {
    let workflow = ReconciliationWorkflow::standard();
    let verdict = workflow.run("garbage", "").await.unwrap();

    assert!(verdict.contains("RECONCILIATION VERDICT: INCONCLUSIVE"));
    assert!(verdict.contains("Manual review required"));
}

#[tokio::test]
async fn literal_zero_amounts_reconcile_as_yes() {
    // "0" is a real value, not a missing-data sentinel.
    let workflow = ReconciliationWorkflow::standard();
    let verdict = workflow.run("0", "0").await.unwrap();
    assert!(verdict.contains("RECONCILIATION VERDICT: YES"));
}

#[tokio::test]
async fn single_missing_side_yields_no() {
    let workflow = ReconciliationWorkflow::standard();
    let verdict = workflow.run("$500.00", "").await.unwrap();
    assert!(verdict.contains("RECONCILIATION VERDICT: NO"));
}

#[tokio::test]
async fn repeated_runs_get_distinct_traces_and_identical_verdicts() {
    let workflow = ReconciliationWorkflow::standard();
    let first = workflow.run("$500.00", "$500.00").await.unwrap();
    let first_trace = workflow.last_trace_id().unwrap();
    let second = workflow.run("$500.00", "$500.00").await.unwrap();
    let second_trace = workflow.last_trace_id().unwrap();

    assert_eq!(first, second);
    assert_ne!(first_trace, second_trace);
}

#[tokio::test]
async fn trace_records_stages_in_execution_order() {
    let workflow = ReconciliationWorkflow::standard();
    workflow.run("$250.00", "$250.00").await.unwrap();

    let trace = workflow.trace(None).unwrap();
    assert!(trace.sealed());
    let stages: Vec<&str> = trace
        .workflow_steps
        .iter()
        .map(|step| step.stage.as_str())
        .collect();
    assert_eq!(stages, [PARSE_AMOUNTS, COMPARE_AMOUNTS, GENERATE_VERDICT]);

    for step in &trace.workflow_steps {
        assert!(!step.thinking.is_empty());
        assert_eq!(step.snapshot["workflow_step"], step.stage);
    }

    // Parse canonicalized the raw currency strings.
    assert_eq!(trace.workflow_steps[0].snapshot["invoice_amount"], "250");
    let final_state = trace.final_state.unwrap();
    assert_eq!(final_state["has_error"], false);
    assert_eq!(final_state["workflow_step"], GENERATE_VERDICT);
}

#[tokio::test]
async fn metrics_cover_every_run() {
    let store = Arc::new(TraceStore::new());
    let workflow = ReconciliationWorkflow::with_store(store.clone());

    workflow.run("$10.00", "$10.00").await.unwrap();
    workflow.run("$10.00", "$20.00").await.unwrap();

    let metrics = workflow.metrics();
    assert_eq!(metrics.total_executions, 2);
    assert_eq!(metrics.success_rate, 1.0);
    assert_eq!(metrics.total_steps, 6);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn live_state_reports_idle_after_runs() {
    let workflow = ReconciliationWorkflow::standard();
    workflow.run("$10.00", "$10.00").await.unwrap();

    let live = workflow.live_state();
    assert_eq!(live.workflow_status, WorkflowStatus::Idle);
    assert_eq!(live.total_traces, 1);
    assert!(live.current_trace_id.is_some());
    assert_eq!(live.current_metrics.total_executions, 1);
}

#[tokio::test]
async fn export_defaults_to_the_latest_run() {
    let workflow = ReconciliationWorkflow::standard();
    workflow.run("$42.00", "$42.00").await.unwrap();

    let document = workflow.export(None, None).unwrap();
    assert!(document.get("trace_data").is_some());
    assert!(document.get("workflow_metrics").is_some());
    assert!(document.get("export_timestamp").is_some());
    assert!(document.get("version_tag").is_some());
}

#[tokio::test]
async fn export_without_any_run_is_an_error() {
    let workflow = ReconciliationWorkflow::standard();
    let err = workflow.export(None, None).unwrap_err();
    assert!(matches!(err, WorkflowError::NoRuns));
}

#[test]
fn builder_rejects_an_empty_machine() {
    let err = WorkflowBuilder::new().build().unwrap_err();
    assert!(matches!(err, WorkflowError::NoStages));
}

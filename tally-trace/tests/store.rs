use chrono::Utc;
use serde_json::json;
use tally_trace::{RunOutcome, StepRecord, TraceError, TraceStore};

fn step(stage: &str) -> StepRecord {
    StepRecord {
        stage: stage.to_string(),
        timestamp: Utc::now(),
        thinking: format!("{stage} narration"),
        snapshot: json!({ "workflow_step": stage }),
    }
}

#[test]
fn run_lifecycle_appends_and_seals() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");

    store.record_step(&trace_id, step("parse_amounts")).unwrap();
    store.record_step(&trace_id, step("compare_amounts")).unwrap();
    store
        .seal(&trace_id, RunOutcome::success("verdict text"))
        .unwrap();

    let trace = store.trace(&trace_id).unwrap();
    assert!(trace.sealed());
    assert!(trace.succeeded());
    assert_eq!(trace.workflow_steps.len(), 2);
    assert_eq!(trace.workflow_steps[0].stage, "parse_amounts");
    assert_eq!(trace.result.as_deref(), Some("verdict text"));
    assert!(trace.duration_seconds().is_some());
}

#[test]
fn trace_ids_are_distinct_within_the_same_second() {
    let store = TraceStore::new();
    let first = store.start_run("reconciliation");
    let second = store.start_run("reconciliation");
    assert_ne!(first, second);
    assert!(first.starts_with("reconciliation_trace_"));
}

#[test]
fn recording_against_unknown_trace_fails() {
    let store = TraceStore::new();
    let err = store.record_step("missing", step("parse_amounts")).unwrap_err();
    assert!(matches!(err, TraceError::NotFound(_)));
}

#[test]
fn sealed_traces_reject_further_steps() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");
    store.seal(&trace_id, RunOutcome::success("done")).unwrap();

    let err = store.record_step(&trace_id, step("late")).unwrap_err();
    assert!(matches!(err, TraceError::AlreadySealed(_)));
}

#[test]
fn sealing_twice_is_an_error() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");
    store.seal(&trace_id, RunOutcome::success("done")).unwrap();

    let err = store
        .seal(&trace_id, RunOutcome::success("again"))
        .unwrap_err();
    assert!(matches!(err, TraceError::AlreadySealed(_)));

    // First seal wins.
    let trace = store.trace(&trace_id).unwrap();
    assert_eq!(trace.result.as_deref(), Some("done"));
}

#[test]
fn metrics_aggregate_over_all_runs() {
    let store = TraceStore::new();

    for index in 0..4 {
        let trace_id = store.start_run("reconciliation");
        store.record_step(&trace_id, step("parse_amounts")).unwrap();
        let outcome = if index == 3 {
            RunOutcome::failure("stage blew up")
        } else {
            RunOutcome::success("ok")
        };
        store.seal(&trace_id, outcome).unwrap();
    }

    let metrics = store.metrics();
    assert_eq!(metrics.total_executions, 4);
    assert_eq!(metrics.failure_rate, 0.25);
    assert_eq!(metrics.success_rate, 0.75);
    assert_eq!(metrics.total_steps, 4);
    assert!(metrics.min_duration <= metrics.max_duration);
}

#[test]
fn metrics_on_empty_store_are_zeroed() {
    let store = TraceStore::new();
    let metrics = store.metrics();
    assert_eq!(metrics.total_executions, 0);
    assert_eq!(metrics.failure_rate, 0.0);
}

#[test]
fn export_carries_the_flat_document_keys() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");
    store.record_step(&trace_id, step("parse_amounts")).unwrap();
    store.seal(&trace_id, RunOutcome::success("verdict")).unwrap();

    let document = store.export(&trace_id).unwrap();
    assert!(document.get("trace_data").is_some());
    assert!(document.get("workflow_metrics").is_some());
    assert!(document.get("export_timestamp").is_some());
    assert!(document.get("version_tag").is_some());

    let observability = &document["trace_data"]["observability"];
    assert_eq!(observability["total_workflow_steps"], 1);
    assert_eq!(observability["success_rate"], 1.0);
}

#[test]
fn export_requires_a_sealed_trace() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");

    let err = store.export(&trace_id).unwrap_err();
    assert!(matches!(err, TraceError::Unsealed(_)));

    let err = store.export("missing").unwrap_err();
    assert!(matches!(err, TraceError::NotFound(_)));
}

#[test]
fn export_to_file_writes_parseable_json() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");
    store.seal(&trace_id, RunOutcome::success("verdict")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output").join("trace.json");
    store.export_to_file(&trace_id, &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["trace_data"]["trace_id"], trace_id);
    assert!(document["version_tag"].as_str().unwrap().starts_with("tally-trace/"));
}

#[test]
fn capacity_bound_evicts_oldest_sealed_trace() {
    let store = TraceStore::with_capacity(2);

    let first = store.start_run("reconciliation");
    store.seal(&first, RunOutcome::success("one")).unwrap();
    let second = store.start_run("reconciliation");
    store.seal(&second, RunOutcome::success("two")).unwrap();
    let third = store.start_run("reconciliation");
    store.seal(&third, RunOutcome::success("three")).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.trace(&first).is_none());
    assert!(store.trace(&second).is_some());
    assert!(store.trace(&third).is_some());
}

#[test]
fn unsealed_traces_survive_eviction() {
    let store = TraceStore::with_capacity(1);

    let in_flight = store.start_run("reconciliation");
    let newer = store.start_run("reconciliation");

    // The oldest trace is still running, so nothing can be evicted yet.
    assert!(store.trace(&in_flight).is_some());
    assert!(store.trace(&newer).is_some());
}

#[test]
fn failure_outcome_records_error_and_result() {
    let store = TraceStore::new();
    let trace_id = store.start_run("reconciliation");
    store
        .seal(&trace_id, RunOutcome::failure("state corrupted"))
        .unwrap();

    let trace = store.trace(&trace_id).unwrap();
    assert!(!trace.succeeded());
    assert_eq!(trace.error.as_deref(), Some("state corrupted"));
    assert!(trace
        .result
        .as_deref()
        .unwrap()
        .contains("Error during reconciliation"));
    assert_eq!(trace.observability().success_rate, 0.0);
}

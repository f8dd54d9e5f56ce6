use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use tally_trace::{RunOutcome, StepRecord, Trace, TraceStore, WorkflowMetrics};

use crate::error::WorkflowError;
use crate::observer::Observer;
use crate::stage::Stage;
use crate::stages::{CompareAmounts, GenerateVerdict, ParseAmounts};
use crate::state::ReconciliationState;

const DEFAULT_LABEL: &str = "reconciliation";

pub struct WorkflowBuilder {
    stages: Vec<Box<dyn Stage>>,
    observers: Vec<Arc<dyn Observer>>,
    store: Option<Arc<TraceStore>>,
    label: String,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            observers: Vec::new(),
            store: None,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn add_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn with_store(mut self, store: Arc<TraceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Label prefixed onto trace ids, `reconciliation` by default.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn build(self) -> Result<ReconciliationWorkflow, WorkflowError> {
        if self.stages.is_empty() {
            return Err(WorkflowError::NoStages);
        }
        Ok(ReconciliationWorkflow {
            stages: self.stages,
            observers: self.observers,
            store: self.store.unwrap_or_else(|| Arc::new(TraceStore::new())),
            label: self.label,
            last_trace_id: RwLock::new(None),
            in_flight: AtomicUsize::new(0),
        })
    }
}

/// Linear reconciliation state machine:
/// `parse_amounts → compare_amounts → generate_verdict`.
///
/// Every `run` owns its state and trace id end to end, so concurrent runs
/// against one workflow instance cannot corrupt each other; the only shared
/// pieces are the trace store and the last-trace bookkeeping behind a lock.
pub struct ReconciliationWorkflow {
    stages: Vec<Box<dyn Stage>>,
    observers: Vec<Arc<dyn Observer>>,
    store: Arc<TraceStore>,
    label: String,
    last_trace_id: RwLock<Option<String>>,
    in_flight: AtomicUsize,
}

impl std::fmt::Debug for ReconciliationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationWorkflow")
            .field("label", &self.label)
            .field("stages", &self.stages.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Idle,
    Running,
}

/// Point-in-time view of the workflow, for dashboards and debugging.
#[derive(Clone, Debug, Serialize)]
pub struct LiveWorkflowState {
    pub current_trace_id: Option<String>,
    pub workflow_status: WorkflowStatus,
    pub total_traces: usize,
    pub current_metrics: WorkflowMetrics,
}

impl ReconciliationWorkflow {
    /// The fixed three-stage machine with a fresh private trace store.
    pub fn standard() -> Self {
        Self::with_store(Arc::new(TraceStore::new()))
    }

    /// The fixed three-stage machine against a shared trace store.
    pub fn with_store(store: Arc<TraceStore>) -> Self {
        WorkflowBuilder::new()
            .add_stage(ParseAmounts)
            .add_stage(CompareAmounts)
            .add_stage(GenerateVerdict)
            .with_store(store)
            .build()
            .expect("standard workflow has stages")
    }

    pub fn store(&self) -> &Arc<TraceStore> {
        &self.store
    }

    /// Run one reconciliation and return the verdict report.
    ///
    /// A fresh trace is started for every call; stage-internal failures
    /// degrade the verdict but never fail the run. Only a failure of the
    /// machine itself (e.g. the trace ledger rejecting an append) surfaces
    /// as an error, with the trace sealed accordingly.
    pub async fn run(
        &self,
        invoice_amount: &str,
        spreadsheet_amount: &str,
    ) -> Result<String, WorkflowError> {
        let trace_id = self.store.start_run(&self.label);
        *self.write_last() = Some(trace_id.clone());
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        tracing::info!(trace_id = %trace_id, "reconciliation run started");

        let outcome = self
            .execute(&trace_id, invoice_amount, spreadsheet_amount)
            .await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Ok(verdict) => Ok(verdict),
            Err(err) => {
                tracing::warn!(trace_id = %trace_id, error = %err, "reconciliation run failed");
                // The trace may already be sealed; sealing is best effort here.
                let _ = self
                    .store
                    .seal(&trace_id, RunOutcome::failure(err.to_string()));
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        trace_id: &str,
        invoice_amount: &str,
        spreadsheet_amount: &str,
    ) -> Result<String, WorkflowError> {
        let mut state = ReconciliationState::new(invoice_amount, spreadsheet_amount, trace_id);

        for stage in &self.stages {
            let name = stage.name();
            state.workflow_step = name.to_string();
            for observer in &self.observers {
                observer.on_stage_start(name, &state).await;
            }

            let error_before = state.error.clone();
            let started = Instant::now();
            state = stage.run(state).await;
            let duration_ms = started.elapsed().as_millis();

            if state.error != error_before {
                for observer in &self.observers {
                    observer.on_error(name, &state.error).await;
                }
            }

            let record = StepRecord {
                stage: name.to_string(),
                timestamp: Utc::now(),
                thinking: state.thinking_log.get(name).unwrap_or_default().to_string(),
                snapshot: state.snapshot(),
            };
            self.store.record_step(trace_id, record)?;

            for observer in &self.observers {
                observer.on_stage_end(name, &state, duration_ms).await;
            }
            tracing::debug!(trace_id = %trace_id, stage = name, "stage completed");
        }

        let final_state = json!({
            "workflow_step": state.workflow_step,
            "has_error": state.degraded(),
            "verdict": state.verdict,
            "reconciliation_result": state.reconciliation_result,
        });
        self.store.seal(
            trace_id,
            RunOutcome::success(state.verdict.clone()).with_final_state(final_state),
        )?;

        tracing::info!(trace_id = %trace_id, "reconciliation run sealed");
        Ok(state.verdict)
    }

    pub fn last_trace_id(&self) -> Option<String> {
        self.last_trace_id
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Fetch a trace by id, defaulting to the most recent run.
    pub fn trace(&self, trace_id: Option<&str>) -> Option<Trace> {
        match trace_id {
            Some(id) => self.store.trace(id),
            None => self.last_trace_id().and_then(|id| self.store.trace(&id)),
        }
    }

    pub fn metrics(&self) -> WorkflowMetrics {
        self.store.metrics()
    }

    pub fn live_state(&self) -> LiveWorkflowState {
        LiveWorkflowState {
            current_trace_id: self.last_trace_id(),
            workflow_status: if self.in_flight.load(Ordering::SeqCst) > 0 {
                WorkflowStatus::Running
            } else {
                WorkflowStatus::Idle
            },
            total_traces: self.store.len(),
            current_metrics: self.store.metrics(),
        }
    }

    /// Export a sealed trace (most recent by default) as a JSON document,
    /// optionally writing it to `destination` as well.
    pub fn export(
        &self,
        trace_id: Option<&str>,
        destination: Option<&Path>,
    ) -> Result<Value, WorkflowError> {
        let trace_id = match trace_id {
            Some(id) => id.to_string(),
            None => self.last_trace_id().ok_or(WorkflowError::NoRuns)?,
        };
        let document = self.store.export(&trace_id)?;
        if let Some(path) = destination {
            self.store.export_to_file(&trace_id, path)?;
        }
        Ok(document)
    }

    fn write_last(&self) -> std::sync::RwLockWriteGuard<'_, Option<String>> {
        self.last_trace_id
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

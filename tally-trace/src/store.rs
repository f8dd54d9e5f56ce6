use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::TraceError;
use crate::metrics::{self, WorkflowMetrics};
use crate::trace::{StepRecord, Trace};

/// Schema tag stamped into every export document.
const VERSION_TAG: &str = concat!("tally-trace/", env!("CARGO_PKG_VERSION"));

/// How a run ended, handed to [`TraceStore::seal`].
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub result: String,
    pub error: Option<String>,
    pub final_state: Option<Value>,
}

impl RunOutcome {
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            error: None,
            final_state: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            result: format!("Error during reconciliation: {error}"),
            error: Some(error),
            final_state: None,
        }
    }

    pub fn with_final_state(mut self, final_state: Value) -> Self {
        self.final_state = Some(final_state);
        self
    }
}

/// In-memory append-only ledger of workflow runs.
///
/// Traces live for the process lifetime unless a capacity bound is set, in
/// which case the oldest sealed traces are evicted first. The map itself is
/// safe for concurrent append and read; insertion order is kept separately
/// for eviction and oldest-first iteration.
pub struct TraceStore {
    traces: DashMap<String, Trace>,
    order: Mutex<VecDeque<String>>,
    capacity: Option<usize>,
}

impl Default for TraceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceStore {
    pub fn new() -> Self {
        Self {
            traces: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: None,
        }
    }

    /// Bounded store: once `limit` traces exist, starting a new run evicts
    /// the oldest sealed trace. Unsealed traces are never evicted.
    pub fn with_capacity(limit: usize) -> Self {
        Self {
            traces: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: Some(limit),
        }
    }

    /// Allocate a fresh trace and return its id.
    ///
    /// The id carries a timestamp for humans plus a random suffix so two
    /// runs starting within the same clock second still get distinct ids.
    pub fn start_run(&self, label: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        let trace_id = format!(
            "{label}_trace_{}_{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            &suffix[..8],
        );

        self.traces
            .insert(trace_id.clone(), Trace::started(trace_id.clone()));
        self.lock_order().push_back(trace_id.clone());
        self.evict_over_capacity();

        tracing::debug!(trace_id = %trace_id, "trace started");
        trace_id
    }

    /// Append one step record. Appending to a sealed or unknown trace is an
    /// error.
    pub fn record_step(&self, trace_id: &str, step: StepRecord) -> Result<(), TraceError> {
        let mut entry = self
            .traces
            .get_mut(trace_id)
            .ok_or_else(|| TraceError::NotFound(trace_id.to_string()))?;
        if entry.sealed() {
            return Err(TraceError::AlreadySealed(trace_id.to_string()));
        }
        entry.workflow_steps.push(step);
        Ok(())
    }

    /// Seal a trace with its final outcome. Sealing twice is an error, not
    /// silent mutation.
    pub fn seal(&self, trace_id: &str, outcome: RunOutcome) -> Result<(), TraceError> {
        let mut entry = self
            .traces
            .get_mut(trace_id)
            .ok_or_else(|| TraceError::NotFound(trace_id.to_string()))?;
        if entry.sealed() {
            return Err(TraceError::AlreadySealed(trace_id.to_string()));
        }

        entry.end_time = Some(Utc::now());
        entry.result = Some(outcome.result);
        entry.error = outcome.error;
        entry.final_state = outcome.final_state;

        tracing::debug!(trace_id = %trace_id, failed = entry.error.is_some(), "trace sealed");
        Ok(())
    }

    /// Clone-out read of one trace.
    pub fn trace(&self, trace_id: &str) -> Option<Trace> {
        self.traces.get(trace_id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Aggregate metrics over every trace currently held.
    pub fn metrics(&self) -> WorkflowMetrics {
        let traces: Vec<Trace> = self.traces.iter().map(|entry| entry.clone()).collect();
        metrics::compute(traces.iter())
    }

    /// Render a sealed trace plus a current metrics snapshot as a portable
    /// JSON document. Fails on unknown or unsealed traces.
    pub fn export(&self, trace_id: &str) -> Result<Value, TraceError> {
        let trace = self
            .trace(trace_id)
            .ok_or_else(|| TraceError::NotFound(trace_id.to_string()))?;
        if !trace.sealed() {
            return Err(TraceError::Unsealed(trace_id.to_string()));
        }

        let mut trace_data = serde_json::to_value(&trace)?;
        if let Value::Object(map) = &mut trace_data {
            map.insert(
                "observability".to_string(),
                serde_json::to_value(trace.observability())?,
            );
        }

        Ok(json!({
            "trace_data": trace_data,
            "workflow_metrics": self.metrics(),
            "export_timestamp": Utc::now(),
            "version_tag": VERSION_TAG,
        }))
    }

    /// Write the export document to disk, creating parent directories.
    pub fn export_to_file(&self, trace_id: &str, path: &Path) -> Result<(), TraceError> {
        let document = self.export(trace_id)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        tracing::info!(trace_id = %trace_id, path = %path.display(), "trace exported");
        Ok(())
    }

    fn lock_order(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.order.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn evict_over_capacity(&self) {
        let Some(limit) = self.capacity else {
            return;
        };
        let mut order = self.lock_order();
        while order.len() > limit {
            let Some(oldest) = order.front().cloned() else {
                break;
            };
            let sealed = self
                .traces
                .get(&oldest)
                .map(|entry| entry.sealed())
                .unwrap_or(true);
            if !sealed {
                break;
            }
            order.pop_front();
            self.traces.remove(&oldest);
            tracing::debug!(trace_id = %oldest, "trace evicted over capacity");
        }
    }
}

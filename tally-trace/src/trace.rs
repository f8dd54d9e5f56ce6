use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stage execution inside a run: what ran, when, what it was thinking,
/// and a snapshot of the key state fields at that point.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StepRecord {
    pub stage: String,
    pub timestamp: DateTime<Utc>,
    pub thinking: String,
    pub snapshot: Value,
}

/// Ordered audit log of one workflow run. Created at run start, appended to
/// while the run executes, sealed exactly once at run end. Never mutated
/// after sealing.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Trace {
    pub trace_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub workflow_steps: Vec<StepRecord>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub final_state: Option<Value>,
}

impl Trace {
    pub(crate) fn started(trace_id: String) -> Self {
        Self {
            trace_id,
            start_time: Utc::now(),
            end_time: None,
            workflow_steps: Vec::new(),
            result: None,
            error: None,
            final_state: None,
        }
    }

    pub fn sealed(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Wall-clock duration in seconds, available once sealed.
    pub fn duration_seconds(&self) -> Option<f64> {
        let end = self.end_time?;
        let millis = end.signed_duration_since(self.start_time).num_milliseconds();
        Some(millis as f64 / 1000.0)
    }

    pub fn observability(&self) -> TraceObservability {
        TraceObservability {
            total_workflow_steps: self.workflow_steps.len(),
            execution_duration: self.duration_seconds(),
            thinking_process_length: self
                .workflow_steps
                .iter()
                .map(|step| step.thinking.len())
                .sum(),
            success_rate: if self.succeeded() { 1.0 } else { 0.0 },
        }
    }
}

/// Computed per-trace metrics attached to reads and exports.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TraceObservability {
    pub total_workflow_steps: usize,
    pub execution_duration: Option<f64>,
    pub thinking_process_length: usize,
    pub success_rate: f64,
}

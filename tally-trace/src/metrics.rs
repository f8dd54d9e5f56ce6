use serde::{Deserialize, Serialize};

use crate::trace::Trace;

/// Aggregate view over every trace in a store, computed on demand.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct WorkflowMetrics {
    pub total_executions: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    pub average_duration: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    pub total_steps: usize,
}

pub(crate) fn compute<'a>(traces: impl Iterator<Item = &'a Trace>) -> WorkflowMetrics {
    let mut total = 0usize;
    let mut failed = 0usize;
    let mut total_steps = 0usize;
    let mut durations: Vec<f64> = Vec::new();

    for trace in traces {
        total += 1;
        if !trace.succeeded() {
            failed += 1;
        }
        total_steps += trace.workflow_steps.len();
        if let Some(duration) = trace.duration_seconds() {
            durations.push(duration);
        }
    }

    if total == 0 {
        return WorkflowMetrics::default();
    }

    let successful = total - failed;
    let (min_duration, max_duration, average_duration) = if durations.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = durations.iter().sum();
        let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max, sum / durations.len() as f64)
    };

    WorkflowMetrics {
        total_executions: total,
        success_rate: successful as f64 / total as f64,
        failure_rate: failed as f64 / total as f64,
        average_duration,
        min_duration,
        max_duration,
        total_steps,
    }
}

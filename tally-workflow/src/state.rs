use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use tally_core::ComparisonOutcome;

/// Mutable record threaded through the reconciliation stages.
///
/// `invoice_amount` and `spreadsheet_amount` hold the raw inputs until the
/// parse stage overwrites them with canonical numeric strings. `trace_id` is
/// assigned once before the first stage and never reassigned within a run.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ReconciliationState {
    pub invoice_amount: String,
    pub spreadsheet_amount: String,
    pub reconciliation_result: String,
    /// Typed comparison classification, set by the compare stage. This is
    /// the channel the verdict stage consumes; the summary string above is
    /// display-only.
    pub outcome: Option<ComparisonOutcome>,
    pub verdict: String,
    pub thinking_log: ThinkingLog,
    pub trace_id: String,
    pub workflow_step: String,
    /// Empty unless a stage caught an internal failure. Downstream stages
    /// still run once it is set; the verdict reflects degraded confidence.
    pub error: String,
}

impl ReconciliationState {
    pub fn new(
        invoice_amount: impl Into<String>,
        spreadsheet_amount: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            invoice_amount: invoice_amount.into(),
            spreadsheet_amount: spreadsheet_amount.into(),
            trace_id: trace_id.into(),
            ..Self::default()
        }
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = message.into();
    }

    pub fn degraded(&self) -> bool {
        !self.error.is_empty()
    }

    /// Snapshot of the key fields, attached to every trace step record.
    pub fn snapshot(&self) -> Value {
        json!({
            "workflow_step": self.workflow_step,
            "invoice_amount": self.invoice_amount,
            "spreadsheet_amount": self.spreadsheet_amount,
            "verdict": self.verdict,
        })
    }
}

/// Stage-keyed narration log. Insertion order is execution order; the log
/// accumulates and never shrinks. Re-recording a stage replaces its text in
/// place without moving it.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ThinkingLog {
    entries: Vec<ThinkingEntry>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ThinkingEntry {
    pub stage: String,
    pub thinking: String,
}

impl ThinkingLog {
    pub fn record(&mut self, stage: &str, thinking: impl Into<String>) {
        let thinking = thinking.into();
        match self.entries.iter_mut().find(|entry| entry.stage == stage) {
            Some(entry) => entry.thinking = thinking,
            None => self.entries.push(ThinkingEntry {
                stage: stage.to_string(),
                thinking,
            }),
        }
    }

    pub fn get(&self, stage: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.thinking.as_str())
    }

    /// Stage names in execution order.
    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.stage.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThinkingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

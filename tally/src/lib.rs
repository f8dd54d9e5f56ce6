//! Deterministic invoice/spreadsheet amount reconciliation.
//!
//! Two free-form monetary strings go in; a YES/NO/INCONCLUSIVE verdict with
//! an auditable per-stage trace comes out. See
//! [`ReconciliationWorkflow::run`].

pub use tally_core::{
    compare_amounts, extract_amount, format_currency, generate_verdict, AmountComparison,
    ComparisonOutcome, TallyError, Verdict, VerdictCode, TOLERANCE_PERCENT,
};
pub use tally_trace::{
    RunOutcome, StepRecord, Trace, TraceError, TraceObservability, TraceStore, WorkflowMetrics,
};
pub use tally_workflow::{
    LiveWorkflowState, Observer, ReconciliationState, ReconciliationWorkflow, Stage, ThinkingEntry,
    ThinkingLog, WorkflowBuilder, WorkflowError, WorkflowStatus,
};

#[cfg(feature = "extract")]
pub use tally_extract::{
    fallback_text, is_error_text, DocumentExtractor, ExtractError, FileKind, FixedExtractor,
    SpreadsheetAnalyzer, ERROR_MARKER,
};

pub mod prelude {
    pub use crate::{
        ComparisonOutcome, ReconciliationWorkflow, TraceStore, VerdictCode, WorkflowBuilder,
    };
    #[cfg(feature = "extract")]
    pub use crate::{DocumentExtractor, FileKind, SpreadsheetAnalyzer};
}

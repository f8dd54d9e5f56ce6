use thiserror::Error;

use tally_trace::TraceError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow has no stages")]
    NoStages,
    #[error("no run has completed yet")]
    NoRuns,
    #[error(transparent)]
    Trace(#[from] TraceError),
}

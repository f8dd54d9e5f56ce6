mod error;
mod metrics;
mod store;
mod trace;

pub use error::TraceError;
pub use metrics::WorkflowMetrics;
pub use store::{RunOutcome, TraceStore};
pub use trace::{StepRecord, Trace, TraceObservability};

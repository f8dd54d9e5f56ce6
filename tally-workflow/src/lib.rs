mod error;
mod observer;
mod stage;
mod stages;
mod state;
mod workflow;

pub use error::WorkflowError;
pub use observer::Observer;
pub use stage::{Stage, COMPARE_AMOUNTS, GENERATE_VERDICT, PARSE_AMOUNTS};
pub use stages::{CompareAmounts, GenerateVerdict, ParseAmounts};
pub use state::{ReconciliationState, ThinkingEntry, ThinkingLog};
pub use workflow::{LiveWorkflowState, ReconciliationWorkflow, WorkflowBuilder, WorkflowStatus};

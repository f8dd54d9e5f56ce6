use serde::{Deserialize, Serialize};

use crate::compare::ComparisonOutcome;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictCode {
    Yes,
    No,
    Inconclusive,
}

impl std::fmt::Display for VerdictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictCode::Yes => write!(f, "YES"),
            VerdictCode::No => write!(f, "NO"),
            VerdictCode::Inconclusive => write!(f, "INCONCLUSIVE"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Verdict {
    pub code: VerdictCode,
    pub reasoning: String,
    pub recommendation: String,
    /// Composite report shown to callers. Field order is fixed:
    /// verdict, analysis, details, recommendation.
    pub report: String,
}

/// Map a typed comparison outcome to the final verdict.
///
/// A degraded run (a stage recorded an internal failure, or neither input
/// produced a numeric token) never yields YES: without trustworthy data the
/// answer is INCONCLUSIVE, not a reconciled match.
pub fn generate_verdict(
    outcome: Option<ComparisonOutcome>,
    detail: &str,
    degraded: bool,
) -> Verdict {
    let code = match outcome {
        Some(ComparisonOutcome::Match) if !degraded => VerdictCode::Yes,
        Some(ComparisonOutcome::Mismatch) => VerdictCode::No,
        _ => VerdictCode::Inconclusive,
    };

    let reasoning = match code {
        VerdictCode::Yes => {
            "The amounts from the invoice and spreadsheet match within acceptable tolerance."
        }
        VerdictCode::No => {
            "The amounts from the invoice and spreadsheet do not match. Investigation required."
        }
        VerdictCode::Inconclusive => "Unable to determine match due to data processing errors.",
    }
    .to_string();

    let recommendation = recommendation_for(code).to_string();

    let detail = if detail.is_empty() { "No result" } else { detail };
    let report = format!(
        "RECONCILIATION VERDICT: {code}\n\nANALYSIS:\n{reasoning}\n\nDETAILS:\n{detail}\n\nRECOMMENDATION:\n{recommendation}\n"
    );

    Verdict {
        code,
        reasoning,
        recommendation,
        report,
    }
}

fn recommendation_for(code: VerdictCode) -> &'static str {
    match code {
        VerdictCode::Yes => "Amounts are reconciled. Proceed with processing.",
        VerdictCode::No => {
            "Amounts do not match. Review source documents and resolve discrepancies before proceeding."
        }
        VerdictCode::Inconclusive => "Manual review required to determine data accuracy.",
    }
}

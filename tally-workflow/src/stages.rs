use async_trait::async_trait;

use tally_core::{
    compare_amounts, extract_amount, format_currency, generate_verdict, AmountComparison,
    TallyError, TOLERANCE_PERCENT,
};

use crate::stage::{Stage, COMPARE_AMOUNTS, GENERATE_VERDICT, PARSE_AMOUNTS};
use crate::state::ReconciliationState;

fn display_or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not provided)"
    } else {
        value
    }
}

/// Stage 1: extract numeric values from both raw inputs and canonicalize
/// the state. A side with no numeric token falls back to "0"; when both
/// sides fail the run is marked degraded so the verdict cannot claim a
/// reconciled match on missing data.
pub struct ParseAmounts;

#[async_trait]
impl Stage for ParseAmounts {
    fn name(&self) -> &'static str {
        PARSE_AMOUNTS
    }

    async fn run(&self, mut state: ReconciliationState) -> ReconciliationState {
        let mut thinking = format!(
            "AMOUNT PARSING\n==============\nInvoice input: {}\nSpreadsheet input: {}\n\n",
            display_or_placeholder(&state.invoice_amount),
            display_or_placeholder(&state.spreadsheet_amount),
        );

        let invoice = extract_amount(&state.invoice_amount);
        let spreadsheet = extract_amount(&state.spreadsheet_amount);
        thinking.push_str(&format!(
            "- invoice amount extracted: {}\n",
            describe(invoice)
        ));
        thinking.push_str(&format!(
            "- spreadsheet amount extracted: {}\n",
            describe(spreadsheet)
        ));

        state.invoice_amount = canonical(invoice);
        state.spreadsheet_amount = canonical(spreadsheet);

        if invoice.is_none() && spreadsheet.is_none() {
            state.record_error("no numeric value found in either input");
            thinking.push_str("\nNeither input produced a numeric token; continuing degraded\n");
        } else {
            thinking.push_str("\nAmount parsing completed\n");
        }

        state.thinking_log.record(self.name(), thinking);
        state
    }
}

fn describe(value: Option<f64>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "none".to_string(),
    }
}

fn canonical(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "0".to_string())
}

/// Stage 2: compare the canonical amounts under the tolerance policy and
/// record both the typed outcome and the display summary.
pub struct CompareAmounts;

impl CompareAmounts {
    fn apply(&self, state: &mut ReconciliationState) -> Result<AmountComparison, TallyError> {
        let invoice = parse_canonical(&state.invoice_amount)?;
        let spreadsheet = parse_canonical(&state.spreadsheet_amount)?;
        let comparison = compare_amounts(invoice, spreadsheet);
        state.reconciliation_result = comparison.summary.clone();
        state.outcome = Some(comparison.outcome);
        Ok(comparison)
    }
}

fn parse_canonical(value: &str) -> Result<f64, TallyError> {
    value.parse::<f64>().map_err(|err| TallyError::InvalidAmount {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

#[async_trait]
impl Stage for CompareAmounts {
    fn name(&self) -> &'static str {
        COMPARE_AMOUNTS
    }

    async fn run(&self, mut state: ReconciliationState) -> ReconciliationState {
        let mut thinking = format!(
            "AMOUNT COMPARISON\n=================\nInvoice amount: ${}\nSpreadsheet amount: ${}\n\n",
            state.invoice_amount, state.spreadsheet_amount,
        );

        match self.apply(&mut state) {
            Ok(comparison) => {
                thinking.push_str(&format!(
                    "- absolute difference: ${}\n",
                    format_currency(comparison.difference)
                ));
                thinking.push_str(&format!(
                    "- percentage difference: {:.2}%\n",
                    comparison.percent_difference
                ));
                thinking.push_str(&format!("- tolerance threshold: {TOLERANCE_PERCENT}%\n"));
                thinking.push_str(&format!("- amounts match: {}\n", comparison.is_match()));
                thinking.push_str(&format!("\nComparison result: {}\n", comparison.summary));
            }
            Err(err) => {
                state.reconciliation_result = format!("Error comparing amounts: {err}");
                state.record_error(err.to_string());
                thinking.push_str(&format!("\nError during amount comparison: {err}\n"));
            }
        }

        state.thinking_log.record(self.name(), thinking);
        state
    }
}

/// Stage 3: map the typed outcome (plus degradation) to the final verdict
/// report.
pub struct GenerateVerdict;

#[async_trait]
impl Stage for GenerateVerdict {
    fn name(&self) -> &'static str {
        GENERATE_VERDICT
    }

    async fn run(&self, mut state: ReconciliationState) -> ReconciliationState {
        let mut thinking = format!(
            "VERDICT GENERATION\n==================\nReconciliation result: {}\n\n",
            display_or_placeholder(&state.reconciliation_result),
        );

        let verdict = generate_verdict(
            state.outcome,
            &state.reconciliation_result,
            state.degraded(),
        );
        thinking.push_str(&format!("- final verdict: {}\n", verdict.code));
        thinking.push_str(&format!("- reasoning: {}\n", verdict.reasoning));

        state.verdict = verdict.report;
        state.thinking_log.record(self.name(), thinking);
        state
    }
}

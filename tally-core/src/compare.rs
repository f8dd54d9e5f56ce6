use serde::{Deserialize, Serialize};

use crate::amount::format_currency;

/// Maximum percentage difference that still counts as a match, inclusive.
pub const TOLERANCE_PERCENT: f64 = 1.0;

/// Typed classification of a comparison. Downstream consumers branch on
/// this, never on the display summary.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOutcome {
    Match,
    Mismatch,
}

impl std::fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonOutcome::Match => write!(f, "MATCH"),
            ComparisonOutcome::Mismatch => write!(f, "MISMATCH"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AmountComparison {
    pub difference: f64,
    pub percent_difference: f64,
    pub outcome: ComparisonOutcome,
    /// Human-readable summary for reports and narration. Display-only.
    pub summary: String,
}

impl AmountComparison {
    pub fn is_match(&self) -> bool {
        self.outcome == ComparisonOutcome::Match
    }
}

/// Compare two canonical amounts under the fixed tolerance policy.
///
/// Percentage difference is relative to the larger amount, defined as zero
/// when the larger amount is zero so that both-zero inputs trivially match.
pub fn compare_amounts(invoice: f64, spreadsheet: f64) -> AmountComparison {
    let difference = (invoice - spreadsheet).abs();
    let larger = invoice.max(spreadsheet);
    let percent_difference = if larger > 0.0 {
        difference / larger * 100.0
    } else {
        0.0
    };

    let outcome = if percent_difference <= TOLERANCE_PERCENT {
        ComparisonOutcome::Match
    } else {
        ComparisonOutcome::Mismatch
    };

    let summary = match outcome {
        ComparisonOutcome::Match => format!(
            "MATCH: Invoice amount ${} matches spreadsheet amount ${} (difference: ${})",
            format_currency(invoice),
            format_currency(spreadsheet),
            format_currency(difference),
        ),
        ComparisonOutcome::Mismatch => format!(
            "MISMATCH: Invoice amount ${} does not match spreadsheet amount ${} (difference: ${}, {:.2}%)",
            format_currency(invoice),
            format_currency(spreadsheet),
            format_currency(difference),
            percent_difference,
        ),
    };

    AmountComparison {
        difference,
        percent_difference,
        outcome,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_amounts_match() {
        let comparison = compare_amounts(100.0, 100.0);
        assert!(comparison.is_match());
        assert_eq!(comparison.difference, 0.0);
        assert_eq!(comparison.percent_difference, 0.0);
    }

    #[test]
    fn one_percent_difference_is_inclusive_match() {
        let comparison = compare_amounts(100.0, 99.0);
        assert_eq!(comparison.percent_difference, 1.0);
        assert!(comparison.is_match());
    }

    #[test]
    fn two_percent_difference_is_mismatch() {
        let comparison = compare_amounts(100.0, 98.0);
        assert_eq!(comparison.percent_difference, 2.0);
        assert_eq!(comparison.outcome, ComparisonOutcome::Mismatch);
    }

    #[test]
    fn both_zero_match_without_dividing_by_zero() {
        let comparison = compare_amounts(0.0, 0.0);
        assert!(comparison.is_match());
        assert_eq!(comparison.percent_difference, 0.0);
    }

    #[test]
    fn order_of_operands_does_not_matter() {
        let forward = compare_amounts(100.0, 98.0);
        let reversed = compare_amounts(98.0, 100.0);
        assert_eq!(forward.outcome, reversed.outcome);
        assert_eq!(forward.percent_difference, reversed.percent_difference);
    }

    #[test]
    fn match_summary_embeds_formatted_amounts() {
        let comparison = compare_amounts(1234.5, 1234.5);
        assert!(comparison.summary.starts_with("MATCH:"));
        assert!(comparison.summary.contains("$1,234.50"));
        assert!(comparison.summary.contains("difference: $0.00"));
    }

    #[test]
    fn mismatch_summary_embeds_percentage() {
        let comparison = compare_amounts(500.0, 400.0);
        assert!(comparison.summary.starts_with("MISMATCH:"));
        assert!(comparison.summary.contains("$500.00"));
        assert!(comparison.summary.contains("$400.00"));
        assert!(comparison.summary.contains("20.00%"));
    }
}

mod amount;
mod compare;
mod error;
mod verdict;

pub use amount::{extract_amount, format_currency};
pub use compare::{compare_amounts, AmountComparison, ComparisonOutcome, TOLERANCE_PERCENT};
pub use error::TallyError;
pub use verdict::{generate_verdict, Verdict, VerdictCode};

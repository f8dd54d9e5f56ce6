use std::sync::OnceLock;

use regex::Regex;

/// Symbols stripped before the numeric scan. Thousands separators go with
/// them so `1,234.56` survives as a single token.
const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-+]?\d*\.?\d+").expect("valid number pattern"))
}

/// Extract the principal monetary value from free-form text.
///
/// Strips currency symbols and comma separators, scans for every
/// signed-decimal token, and returns the largest value that parses. The
/// largest number in an amount-bearing string is assumed to be the principal
/// amount rather than a line item or percentage. Returns `None` when no
/// token parses; tokens that fail `f64` parsing are skipped, never fatal.
pub fn extract_amount(text: &str) -> Option<f64> {
    if text.trim().is_empty() {
        return None;
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',')
        .collect();

    number_pattern()
        .find_iter(&cleaned)
        .filter_map(|token| token.as_str().parse::<f64>().ok())
        .fold(None, |best, value| match best {
            Some(current) if current >= value => Some(current),
            _ => Some(value),
        })
}

/// Two-decimal currency rendering with comma thousands grouping,
/// e.g. `1234.5` → `"1,234.50"`.
pub fn format_currency(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped: Vec<char> = Vec::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, ch) in int_part.chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let int_grouped: String = grouped.into_iter().rev().collect();

    if value < 0.0 {
        format!("-{int_grouped}.{frac_part}")
    } else {
        format!("{int_grouped}.{frac_part}")
    }
}

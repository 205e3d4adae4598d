//! Currency and number text helpers
//!
//! Site text is messy ("₹1,234.50", "2.90x"). Anything that does not parse
//! becomes 0 rather than an error.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Everything that is not part of a plain decimal number
    static ref RE_NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]+").unwrap();

    /// Leading decimal number, as a lenient float parser would read it
    static ref RE_LEADING_NUMBER: Regex = Regex::new(r"^[+\-]?(\d+\.?\d*|\.\d+)").unwrap();
}

/// Symbols for the codes the site shows; other codes render upper-cased
const SYMBOLS: &[(&str, &str)] = &[
    ("inr", "₹"),
    ("btc", "₿"),
    ("eth", "Ξ"),
    ("ltc", "Ł"),
    ("usdt", "₮"),
    ("sol", "◎"),
    ("doge", "Ð"),
];

/// Leading number of `text`, 0 when there is none
fn leading_number(text: &str) -> f64 {
    RE_LEADING_NUMBER
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a wallet or bet label after dropping symbols, spaces and separators
pub fn parse_amount(text: &str) -> f64 {
    leading_number(&RE_NON_NUMERIC.replace_all(text, ""))
}

/// Parse a multiplier label such as "2.90x"
pub fn parse_multiplier(text: &str) -> f64 {
    leading_number(text)
}

/// Display symbol for a currency code, case-insensitive
pub fn currency_symbol(code: &str) -> String {
    let code = code.trim().to_lowercase();
    SYMBOLS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| s.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// Symbol followed by the amount to two decimals
pub fn format_amount(amount: f64, code: &str) -> String {
    format!("{}{:.2}", currency_symbol(code), amount)
}

// =============================================================================
// TESTS
// =============================================================================

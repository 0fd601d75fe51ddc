//! Locale-tolerant price and count normalization.
//!
//! Listing markup renders prices as `₹45,231.00` and review counts as
//! `1,234 ratings`. Pages served with a broken charset render the rupee
//! sign as mojibake, so the known garbled spellings are stripped alongside
//! the correct symbol before numeric extraction.

use regex::Regex;
use std::sync::LazyLock;

/// Rupee symbol plus the mojibake forms seen on mis-encoded pages.
/// Longest first so partial garbles are not left behind.
const CURRENCY_GLYPHS: [&str; 3] = ["Ã¢â€šÂ¹", "â‚¹", "₹"];

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("static regex"));

static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));

/// Parse a display price into a numeric value.
///
/// Strips the currency symbol (including garbled variants) and thousands
/// separators, then takes the first digit run with an optional decimal
/// part. Returns `None` when the text contains no digits.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let mut cleaned = text.to_string();
    for glyph in CURRENCY_GLYPHS {
        cleaned = cleaned.replace(glyph, "");
    }
    cleaned = cleaned.replace(',', "");

    DECIMAL_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse a free-text count like `1,234 ratings` into an integer.
///
/// Returns 0 when no digits are present.
#[must_use]
pub fn parse_count(text: &str) -> u64 {
    let cleaned = text.replace(',', "");
    INTEGER_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Discount percentage of `current` against `original`, rounded to two
/// decimal places.
///
/// Returns 0.0 when either price is absent or the original price does not
/// exceed the current one.
#[must_use]
pub fn compute_discount(current: Option<f64>, original: Option<f64>) -> f64 {
    let (Some(current), Some(original)) = (current, original) else {
        return 0.0;
    };
    if original <= current {
        return 0.0;
    }
    let percent = (original - current) / original * 100.0;
    (percent * 100.0).round() / 100.0
}

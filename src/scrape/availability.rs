//! Availability classification from heterogeneous markup signals.
//!
//! The availability section can contradict itself ("In stock" inside a
//! "Currently unavailable" banner), so negative phrases are checked before
//! positive patterns. When the section is absent or undecided, enabled
//! cart/buy controls are the fallback, and absence of any positive signal
//! means not purchasable.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Phrases that mark a listing as not purchasable. Checked first.
const NEGATIVE_PHRASES: [&str; 5] = [
    "currently unavailable",
    "out of stock",
    "temporarily out of stock",
    "this item is not available",
    "item not available",
];

/// Patterns that mark a listing as purchasable, checked only after no
/// negative phrase matched.
static POSITIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)in stock",
        r"(?i)available",
        r"(?i)only .* left in stock",
        r"(?i)usually dispatched",
        r"(?i)ships from and sold by amazon",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

static AVAILABILITY_SECTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#availability").expect("static selector"));

static ADD_TO_CART: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input#add-to-cart-button").expect("static selector"));

static BUY_NOW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("input#buy-now-button").expect("static selector"));

/// Classify whether the listing in `doc` is purchasable.
#[must_use]
pub fn is_available(doc: &Html) -> bool {
    if let Some(section) = doc.select(&AVAILABILITY_SECTION).next() {
        let text: String = section.text().collect::<String>().trim().to_string();
        let lowered = text.to_lowercase();

        for phrase in NEGATIVE_PHRASES {
            if lowered.contains(phrase) {
                return false;
            }
        }

        for pattern in POSITIVE_PATTERNS.iter() {
            if pattern.is_match(&text) {
                return true;
            }
        }
    }

    // No decisive text; fall back to interactive controls.
    if let Some(cart) = doc.select(&ADD_TO_CART).next() {
        if cart.value().attr("disabled").is_none() {
            return true;
        }
    }

    if let Some(buy) = doc.select(&BUY_NOW).next() {
        if buy.value().attr("disabled").is_none() {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn negative_phrase_wins_over_positive_text() {
        let html = doc(r#"<div id="availability">In stock. Currently unavailable.</div>"#);
        assert!(!is_available(&html));
    }

    #[test]
    fn positive_pattern_marks_available() {
        assert!(is_available(&doc(
            r#"<div id="availability">In stock</div>"#
        )));
        assert!(is_available(&doc(
            r#"<div id="availability">Only 3 left in stock</div>"#
        )));
        assert!(is_available(&doc(
            r#"<div id="availability">Usually dispatched in 2 days</div>"#
        )));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(!is_available(&doc(
            r#"<div id="availability">CURRENTLY UNAVAILABLE</div>"#
        )));
        assert!(is_available(&doc(
            r#"<div id="availability">IN STOCK</div>"#
        )));
    }

    #[test]
    fn undecided_section_falls_back_to_cart_button() {
        let html = doc(
            r#"<div id="availability">See below</div>
               <input id="add-to-cart-button" type="submit">"#,
        );
        assert!(is_available(&html));
    }

    #[test]
    fn disabled_cart_falls_through_to_buy_now() {
        let html = doc(
            r#"<input id="add-to-cart-button" disabled>
               <input id="buy-now-button" type="submit">"#,
        );
        assert!(is_available(&html));
    }

    #[test]
    fn no_signals_means_unavailable() {
        assert!(!is_available(&doc("<p>Some product page</p>")));
    }

    #[test]
    fn disabled_controls_mean_unavailable() {
        let html = doc(
            r#"<input id="add-to-cart-button" disabled>
               <input id="buy-now-button" disabled>"#,
        );
        assert!(!is_available(&html));
    }
}

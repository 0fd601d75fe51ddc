//! Field extraction from a single listing document.
//!
//! Availability is decided first; unavailable listings short-circuit with
//! only their URLs populated. Every other field defaults independently, so
//! extraction never fails a record for missing markup.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::domain::price::{compute_discount, parse_count, parse_price};
use crate::domain::product::ProductRecord;

use super::availability::is_available;
use super::link::monetize_url;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span#productTitle").expect("static selector"));

/// Current-price locations, most specific first. The first non-empty match
/// wins.
static CURRENT_PRICE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "span.a-price-whole",
        "span#priceblock_ourprice",
        "span#priceblock_dealprice",
        "span.a-price.a-text-price.a-size-medium.apexPriceToPay span.a-offscreen",
        "span.a-price-symbol + span.a-price-whole",
    ]
    .into_iter()
    .map(|s| Selector::parse(s).expect("static selector"))
    .collect()
});

/// Pre-discount price locations, same ordered-fallback pattern.
static ORIGINAL_PRICE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "span.a-price.a-text-price span.a-offscreen",
        "span#listPrice",
        "span.a-price-was span.a-offscreen",
    ]
    .into_iter()
    .map(|s| Selector::parse(s).expect("static selector"))
    .collect()
});

static RATING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.a-icon-alt").expect("static selector"));

static REVIEW_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span#acrCustomerReviewText").expect("static selector"));

static AVAILABILITY_DISPLAY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#availability span").expect("static selector"));

static PRIME_BADGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.a-icon-prime").expect("static selector"));

static RATING_VALUE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\d+\.?\d*").expect("static regex"));

/// Extract a [`ProductRecord`] from raw listing markup.
///
/// `tag` is the monetization tag used for link rewriting; empty disables
/// rewriting.
#[must_use]
pub fn extract_product(html: &str, source_url: &str, tag: &str) -> ProductRecord {
    let doc = Html::parse_document(html);
    let monetized = monetize_url(source_url, tag);

    if !is_available(&doc) {
        return ProductRecord::unavailable(source_url.to_string(), monetized);
    }

    let title = doc
        .select(&TITLE)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_default();

    let current_price = first_match(&doc, &CURRENT_PRICE);
    let original_price = first_match(&doc, &ORIGINAL_PRICE);

    let current_price_value = current_price.as_deref().and_then(parse_price);
    let original_price_value = original_price.as_deref().and_then(parse_price);
    let discount_percent = compute_discount(current_price_value, original_price_value);

    let rating = doc.select(&RATING).next().and_then(|e| {
        let text = element_text(&e);
        RATING_VALUE
            .find(&text)
            .and_then(|m| m.as_str().parse().ok())
    });

    let review_count_text = doc
        .select(&REVIEW_COUNT)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_default();

    let availability_text = doc
        .select(&AVAILABILITY_DISPLAY)
        .next()
        .map(|e| element_text(&e))
        .unwrap_or_else(|| "Available".into());

    ProductRecord {
        title,
        review_count: parse_count(&review_count_text),
        review_count_text,
        current_price,
        current_price_value,
        original_price,
        original_price_value,
        discount_percent,
        rating,
        availability_text,
        is_available: true,
        is_prime_eligible: doc.select(&PRIME_BADGE).next().is_some(),
        source_url: source_url.to_string(),
        monetized_url: monetized,
        page_index: 0,
    }
}

/// Trimmed text content of one element.
fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First non-empty text among the ordered selector fallbacks.
fn first_match(doc: &Html, selectors: &[Selector]) -> Option<String> {
    for selector in selectors {
        if let Some(element) = doc.select(selector).next() {
            let text = element_text(&element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <span id="productTitle">  Test Laptop 16GB  </span>
          <div id="availability"><span>In stock</span></div>
          <span class="a-price-whole">₹89,990</span>
          <span class="a-price a-text-price"><span class="a-offscreen">₹1,09,990</span></span>
          <span class="a-icon-alt">4.3 out of 5 stars</span>
          <span id="acrCustomerReviewText">1,245 ratings</span>
          <span class="a-icon-prime"></span>
        </body></html>
    "#;

    #[test]
    fn extracts_all_fields() {
        let record = extract_product(LISTING, "https://www.amazon.in/dp/B0TEST/ref=x", "t-21");

        assert!(record.is_available);
        assert_eq!(record.title, "Test Laptop 16GB");
        assert_eq!(record.current_price.as_deref(), Some("₹89,990"));
        assert_eq!(record.current_price_value, Some(89_990.0));
        assert_eq!(record.original_price_value, Some(109_990.0));
        assert!(record.discount_percent > 18.0 && record.discount_percent < 18.2);
        assert_eq!(record.rating, Some(4.3));
        assert_eq!(record.review_count, 1_245);
        assert_eq!(record.review_count_text, "1,245 ratings");
        assert_eq!(record.availability_text, "In stock");
        assert!(record.is_prime_eligible);
        assert_eq!(record.monetized_url, "https://www.amazon.in/dp/B0TEST?tag=t-21");
    }

    #[test]
    fn unavailable_listing_short_circuits() {
        let html = r#"
            <html><body>
              <span id="productTitle">Ghost Product</span>
              <div id="availability"><span>Currently unavailable</span></div>
              <span class="a-price-whole">₹999</span>
            </body></html>
        "#;
        let record = extract_product(html, "https://www.amazon.in/dp/B0GONE", "t-21");

        assert!(!record.is_available);
        assert!(record.title.is_empty());
        assert!(record.current_price.is_none());
        assert_eq!(record.source_url, "https://www.amazon.in/dp/B0GONE");
    }

    #[test]
    fn missing_fields_default_without_error() {
        let html = r#"
            <html><body>
              <input id="add-to-cart-button" type="submit">
            </body></html>
        "#;
        let record = extract_product(html, "https://www.amazon.in/dp/B0BARE", "");

        assert!(record.is_available);
        assert!(record.title.is_empty());
        assert!(record.current_price.is_none());
        assert_eq!(record.discount_percent, 0.0);
        assert_eq!(record.rating, None);
        assert_eq!(record.review_count, 0);
        assert_eq!(record.availability_text, "Available");
        assert!(!record.is_prime_eligible);
        // Empty tag leaves the URL unmonetized.
        assert_eq!(record.monetized_url, record.source_url);
    }

    #[test]
    fn extraction_is_idempotent() {
        let url = "https://www.amazon.in/dp/B0TEST";
        let first = extract_product(LISTING, url, "t-21");
        let second = extract_product(LISTING, url, "t-21");
        assert_eq!(first, second);
    }

    #[test]
    fn price_selector_order_prefers_specific_markup() {
        let html = r#"
            <html><body>
              <div id="availability"><span>In stock</span></div>
              <span id="priceblock_dealprice">₹499</span>
            </body></html>
        "#;
        let record = extract_product(html, "https://www.amazon.in/dp/B0DEAL", "");
        assert_eq!(record.current_price_value, Some(499.0));
    }
}

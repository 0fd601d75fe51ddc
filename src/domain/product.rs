//! Structured listing records and the presentation-facing deal view.

use serde::Serialize;

/// Structured result of extracting one listing document.
///
/// Every field defaults independently; extraction never fails a record for
/// a missing field. An unavailable record carries only the URLs and the
/// availability flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Listing title, empty if the title element is missing.
    pub title: String,
    /// Raw display text of the current price, as found in the markup.
    pub current_price: Option<String>,
    /// Parsed numeric value of `current_price`.
    pub current_price_value: Option<f64>,
    /// Raw display text of the pre-discount price.
    pub original_price: Option<String>,
    /// Parsed numeric value of `original_price`.
    pub original_price_value: Option<f64>,
    /// Discount percentage, 0 when not computable.
    pub discount_percent: f64,
    /// Star rating on a 0-5 scale.
    pub rating: Option<f64>,
    /// Verbatim review-count label text.
    pub review_count_text: String,
    /// Review count parsed from the label, 0 when absent.
    pub review_count: u64,
    /// Availability display text shown to users.
    pub availability_text: String,
    /// Whether the listing is purchasable.
    pub is_available: bool,
    /// Fast-shipping program membership.
    pub is_prime_eligible: bool,
    /// URL the listing was fetched from.
    pub source_url: String,
    /// Affiliate-rewritten URL, or the source URL when rewriting is off.
    pub monetized_url: String,
    /// 1-based search-results page the listing was found on.
    pub page_index: u32,
}

impl ProductRecord {
    /// Record for a listing classified as not purchasable.
    ///
    /// Only the URLs are populated; all other extraction is skipped.
    #[must_use]
    pub fn unavailable(source_url: String, monetized_url: String) -> Self {
        Self {
            title: String::new(),
            current_price: None,
            current_price_value: None,
            original_price: None,
            original_price_value: None,
            discount_percent: 0.0,
            rating: None,
            review_count_text: String::new(),
            review_count: 0,
            availability_text: String::new(),
            is_available: false,
            is_prime_eligible: false,
            source_url,
            monetized_url,
            page_index: 0,
        }
    }
}

/// Presentation projection of a ranked [`ProductRecord`].
///
/// Built at publish time, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub title: String,
    pub current_price: f64,
    pub original_price: f64,
    pub discount_percent: f64,
    /// `original_price - current_price`.
    pub savings: f64,
    pub rating: f64,
    pub review_count: u64,
    pub availability_text: String,
    pub is_prime_eligible: bool,
    pub deal_score: f64,
    pub source_url: String,
    pub monetized_url: String,
    pub page_index: u32,
}

impl Deal {
    /// Project a scored record into the publish-facing view.
    #[must_use]
    pub fn from_record(record: &ProductRecord, score: f64) -> Self {
        let current = record.current_price_value.unwrap_or(0.0);
        let original = record.original_price_value.unwrap_or(current);

        Self {
            title: record.title.clone(),
            current_price: current,
            original_price: original,
            discount_percent: record.discount_percent,
            savings: original - current,
            rating: record.rating.unwrap_or(0.0),
            review_count: record.review_count,
            availability_text: record.availability_text.clone(),
            is_prime_eligible: record.is_prime_eligible,
            deal_score: score,
            source_url: record.source_url.clone(),
            monetized_url: record.monetized_url.clone(),
            page_index: record.page_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_record_keeps_only_urls() {
        let record = ProductRecord::unavailable("https://a".into(), "https://b".into());
        assert!(!record.is_available);
        assert!(record.title.is_empty());
        assert_eq!(record.source_url, "https://a");
        assert_eq!(record.monetized_url, "https://b");
    }

    #[test]
    fn deal_savings_derive_from_prices() {
        let mut record = ProductRecord::unavailable("u".into(), "m".into());
        record.current_price_value = Some(899.0);
        record.original_price_value = Some(999.0);
        let deal = Deal::from_record(&record, 12.5);
        assert_eq!(deal.savings, 100.0);
        assert_eq!(deal.deal_score, 12.5);
    }

    #[test]
    fn deal_without_original_price_has_zero_savings() {
        let mut record = ProductRecord::unavailable("u".into(), "m".into());
        record.current_price_value = Some(899.0);
        let deal = Deal::from_record(&record, 0.0);
        assert_eq!(deal.original_price, 899.0);
        assert_eq!(deal.savings, 0.0);
    }
}

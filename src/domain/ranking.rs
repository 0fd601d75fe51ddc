//! Deal filtering and ranking.
//!
//! A sequence of pure filter stages over the collected records, then a
//! composite score and a stable descending sort. Determinism matters:
//! equal scores keep their collection order.

use super::criteria::FilterCriteria;
use super::product::ProductRecord;

/// Weight of the discount term in the deal score.
const DISCOUNT_WEIGHT: f64 = 0.4;
/// Weight of the rating term.
const RATING_WEIGHT: f64 = 3.0;
/// Weight of the log-review-volume term.
const REVIEW_WEIGHT: f64 = 0.7;

/// Composite ranking heuristic.
///
/// A missing rating contributes 0 to the rating term.
#[must_use]
pub fn deal_score(record: &ProductRecord) -> f64 {
    DISCOUNT_WEIGHT * record.discount_percent
        + RATING_WEIGHT * record.rating.unwrap_or(0.0)
        + REVIEW_WEIGHT * (1.0 + record.review_count as f64).ln()
}

/// Filter records against the criteria and rank them best first.
///
/// Thresholds are inclusive. The sort is stable, so ties keep their input
/// order. An empty result is a valid outcome, not an error.
#[must_use]
pub fn rank(records: Vec<ProductRecord>, criteria: &FilterCriteria) -> Vec<(ProductRecord, f64)> {
    let mut scored: Vec<(ProductRecord, f64)> = records
        .into_iter()
        .filter(|r| r.is_available && !r.title.is_empty())
        .filter(|r| r.current_price.as_deref().is_some_and(|p| !p.is_empty()))
        .filter(|r| {
            r.current_price_value
                .is_some_and(|p| p >= criteria.min_budget && p <= criteria.max_budget)
        })
        .filter(|r| r.discount_percent >= criteria.min_discount_percent)
        .filter(|r| r.review_count >= criteria.min_review_count)
        .map(|r| {
            let score = deal_score(&r);
            (r, score)
        })
        .collect();

    // Vec::sort_by is stable; total_cmp keeps NaN out of the comparator's way.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, price: f64, discount: f64, reviews: u64) -> ProductRecord {
        ProductRecord {
            title: title.into(),
            current_price: Some(format!("₹{price}")),
            current_price_value: Some(price),
            original_price: None,
            original_price_value: None,
            discount_percent: discount,
            rating: Some(4.0),
            review_count_text: format!("{reviews} ratings"),
            review_count: reviews,
            availability_text: "In stock".into(),
            is_available: true,
            is_prime_eligible: false,
            source_url: "https://www.amazon.in/dp/B0TEST".into(),
            monetized_url: "https://www.amazon.in/dp/B0TEST?tag=t-21".into(),
            page_index: 1,
        }
    }

    fn criteria() -> FilterCriteria {
        FilterCriteria {
            search_term: "laptop".into(),
            max_pages: 3,
            min_discount_percent: 15.0,
            min_review_count: 10,
            min_budget: 0.0,
            max_budget: f64::INFINITY,
            monetization_tag: String::new(),
        }
    }

    #[test]
    fn missing_rating_scores_zero_for_rating_term() {
        let mut r = record("a", 100.0, 10.0, 0);
        r.rating = None;
        r.review_count = 0;
        assert_eq!(deal_score(&r), 0.4 * 10.0);
    }

    #[test]
    fn unavailable_and_untitled_records_are_dropped() {
        let mut unavailable = record("a", 100.0, 50.0, 100);
        unavailable.is_available = false;
        let mut untitled = record("", 100.0, 50.0, 100);
        untitled.title.clear();
        let mut priceless = record("c", 100.0, 50.0, 100);
        priceless.current_price = Some(String::new());

        let ranked = rank(vec![unavailable, untitled, priceless], &criteria());
        assert!(ranked.is_empty());
    }

    #[test]
    fn discount_threshold_is_inclusive() {
        let at = record("at", 100.0, 15.0, 100);
        let below = record("below", 100.0, 14.0, 100);
        let ranked = rank(vec![at, below], &criteria());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0.title, "at");
    }

    #[test]
    fn budget_band_is_inclusive() {
        let mut c = criteria();
        c.min_discount_percent = 0.0;
        c.min_budget = 100.0;
        c.max_budget = 200.0;

        let ranked = rank(
            vec![
                record("low", 99.99, 20.0, 100),
                record("min", 100.0, 20.0, 100),
                record("max", 200.0, 20.0, 100),
                record("high", 200.01, 20.0, 100),
            ],
            &c,
        );
        let titles: Vec<_> = ranked.iter().map(|(r, _)| r.title.as_str()).collect();
        assert_eq!(titles, ["min", "max"]);
    }

    #[test]
    fn review_threshold_is_inclusive() {
        let mut c = criteria();
        c.min_review_count = 100;
        let ranked = rank(
            vec![record("at", 100.0, 20.0, 100), record("below", 100.0, 20.0, 99)],
            &c,
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0.title, "at");
    }

    #[test]
    fn sorts_best_deal_first() {
        let ranked = rank(
            vec![
                record("five", 100.0, 5.0, 100),
                record("twenty", 100.0, 20.0, 100),
                record("fortyfive", 100.0, 45.0, 100),
            ],
            &criteria(),
        );
        let titles: Vec<_> = ranked.iter().map(|(r, _)| r.title.as_str()).collect();
        assert_eq!(titles, ["fortyfive", "twenty"]);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let ranked = rank(
            vec![
                record("first", 100.0, 20.0, 100),
                record("second", 100.0, 20.0, 100),
                record("third", 100.0, 20.0, 100),
            ],
            &criteria(),
        );
        let titles: Vec<_> = ranked.iter().map(|(r, _)| r.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn ranking_is_deterministic() {
        let input = vec![
            record("a", 100.0, 25.0, 10),
            record("b", 120.0, 25.0, 500),
            record("c", 90.0, 40.0, 20),
        ];
        let once = rank(input.clone(), &criteria());
        let twice = rank(input, &criteria());
        assert_eq!(once, twice);
    }
}

//! Per-run filter configuration and string-override coercion.

use std::collections::HashMap;
use tracing::warn;

/// Immutable filter configuration for one discovery run.
///
/// Defaults come from [`crate::config::ScraperConfig`]; the command
/// interface overlays raw string overrides via [`apply_overrides`]
/// (FilterCriteria::apply_overrides).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub max_pages: u32,
    pub min_discount_percent: f64,
    pub min_review_count: u64,
    /// Lower price bound, inclusive.
    pub min_budget: f64,
    /// Upper price bound, inclusive. `f64::INFINITY` when unbounded.
    pub max_budget: f64,
    /// Affiliate tag for link rewriting. Empty disables rewriting.
    pub monetization_tag: String,
}

impl FilterCriteria {
    /// Overlay raw string overrides onto these criteria.
    ///
    /// Recognized keys: `search_term`, `max_pages`, `min_discount`,
    /// `min_review_count`, `min_budget`, `max_budget`. A value that fails
    /// to coerce is logged and the default kept; unknown keys are ignored.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) {
        for (key, value) in overrides {
            match key.as_str() {
                "search_term" => self.search_term = value.clone(),
                "max_pages" => coerce(key, value, &mut self.max_pages),
                "min_discount" => coerce(key, value, &mut self.min_discount_percent),
                "min_review_count" => coerce(key, value, &mut self.min_review_count),
                "min_budget" => coerce(key, value, &mut self.min_budget),
                "max_budget" => coerce(key, value, &mut self.max_budget),
                _ => {}
            }
        }
    }
}

/// Coerce one override value, keeping the existing value on failure.
fn coerce<T: std::str::FromStr>(key: &str, value: &str, slot: &mut T) {
    match value.parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value, "ignoring unparseable filter override"),
    }
}

/// Split `key=value` arguments into an override map.
///
/// Arguments without `=` are ignored. Later duplicates win.
#[must_use]
pub fn parse_override_args<S: AsRef<str>>(args: &[S]) -> HashMap<String, String> {
    let mut overrides = HashMap::new();
    for arg in args {
        if let Some((key, value)) = arg.as_ref().split_once('=') {
            overrides.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FilterCriteria {
        FilterCriteria {
            search_term: "laptop".into(),
            max_pages: 3,
            min_discount_percent: 15.0,
            min_review_count: 50,
            min_budget: 20_000.0,
            max_budget: 150_000.0,
            monetization_tag: "tag-21".into(),
        }
    }

    #[test]
    fn applies_recognized_overrides() {
        let mut criteria = base();
        let overrides = parse_override_args(&[
            "search_term=smartphone",
            "min_discount=30",
            "max_pages=10",
            "min_budget=5000",
        ]);
        criteria.apply_overrides(&overrides);

        assert_eq!(criteria.search_term, "smartphone");
        assert_eq!(criteria.min_discount_percent, 30.0);
        assert_eq!(criteria.max_pages, 10);
        assert_eq!(criteria.min_budget, 5_000.0);
        // Untouched fields keep their defaults.
        assert_eq!(criteria.min_review_count, 50);
    }

    #[test]
    fn coercion_failure_keeps_default() {
        let mut criteria = base();
        let overrides = parse_override_args(&["min_discount=lots", "max_pages=-1"]);
        criteria.apply_overrides(&overrides);

        assert_eq!(criteria.min_discount_percent, 15.0);
        assert_eq!(criteria.max_pages, 3);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut criteria = base();
        let overrides = parse_override_args(&["color=red", "min_discount=20"]);
        criteria.apply_overrides(&overrides);
        assert_eq!(criteria.min_discount_percent, 20.0);
    }

    #[test]
    fn args_without_equals_are_skipped() {
        let overrides = parse_override_args(&["plain", "a=1"]);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides["a"], "1");
    }
}

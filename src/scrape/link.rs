//! Affiliate link rewriting.
//!
//! Rewrites a product URL into the canonical monetized form
//! `https://www.amazon.in/dp/<ASIN>?tag=<tag>`. Never fails the caller:
//! any URL the ASIN cannot be isolated from is returned unchanged.

use tracing::debug;

/// Path markers that precede the ASIN, in priority order.
const PRODUCT_PATH_MARKERS: [&str; 2] = ["/dp/", "/gp/product/"];

const SITE_ROOT: &str = "https://www.amazon.in";

/// Rewrite `product_url` into a monetized variant carrying `tag`.
///
/// Returns the original URL unchanged when the tag is empty or no product
/// identifier can be isolated.
#[must_use]
pub fn monetize_url(product_url: &str, tag: &str) -> String {
    if tag.is_empty() {
        return product_url.to_string();
    }

    let Some(asin) = extract_asin(product_url) else {
        debug!(url = product_url, "no product identifier found, leaving URL unchanged");
        return product_url.to_string();
    };

    format!("{SITE_ROOT}/dp/{asin}?tag={tag}")
}

/// Isolate the ASIN following the first recognized path marker.
///
/// The identifier runs up to the next path or query delimiter.
#[must_use]
pub fn extract_asin(product_url: &str) -> Option<&str> {
    for marker in PRODUCT_PATH_MARKERS {
        if let Some(start) = product_url.find(marker) {
            let rest = &product_url[start + marker.len()..];
            let end = rest
                .find(['/', '?', '#'])
                .unwrap_or(rest.len());
            let asin = &rest[..end];
            if !asin.is_empty() {
                return Some(asin);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_dp_url() {
        let url = monetize_url("https://www.amazon.in/dp/B000123/ref=xyz", "t-21");
        assert_eq!(url, "https://www.amazon.in/dp/B000123?tag=t-21");
    }

    #[test]
    fn rewrites_gp_product_url() {
        let url = monetize_url(
            "https://www.amazon.in/gp/product/B0C9JKL?th=1",
            "t-21",
        );
        assert_eq!(url, "https://www.amazon.in/dp/B0C9JKL?tag=t-21");
    }

    #[test]
    fn query_delimited_asin_is_isolated() {
        assert_eq!(
            extract_asin("https://www.amazon.in/dp/B07XYZ?psc=1"),
            Some("B07XYZ")
        );
    }

    #[test]
    fn empty_tag_leaves_url_unchanged() {
        let original = "https://www.amazon.in/dp/B000123";
        assert_eq!(monetize_url(original, ""), original);
    }

    #[test]
    fn unrecognized_path_leaves_url_unchanged() {
        let original = "https://www.amazon.in/s?k=laptop";
        assert_eq!(monetize_url(original, "t-21"), original);
    }

    #[test]
    fn marker_with_empty_identifier_leaves_url_unchanged() {
        let original = "https://www.amazon.in/dp/?ref=x";
        assert_eq!(monetize_url(original, "t-21"), original);
    }
}

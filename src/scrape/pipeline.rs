//! Collection pipeline: paginate search results, fetch listings, extract.
//!
//! One pipeline instance serves one discovery run and holds no state
//! shared with any other run. Listing fetches are sequential with
//! mandatory courtesy delays; removing them risks the source blocking the
//! HTTP collaborator. A failed page or listing is logged and skipped, the
//! run continues.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::domain::criteria::FilterCriteria;
use crate::domain::product::ProductRecord;
use crate::port::Fetcher;

use super::extract::extract_product;

/// Cap on listing fetches per result page, bounding total work.
pub const LISTINGS_PER_PAGE: usize = 10;

static PRODUCT_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.a-link-normal").expect("static selector"));

/// One discovery run's collection stage.
pub struct CollectionPipeline<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    criteria: &'a FilterCriteria,
    base_url: String,
    listing_delay: Duration,
    page_delay: Duration,
}

impl<'a, F: Fetcher + ?Sized> CollectionPipeline<'a, F> {
    pub fn new(fetcher: &'a F, criteria: &'a FilterCriteria, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            criteria,
            base_url: base_url.into(),
            listing_delay: Duration::from_secs(1),
            page_delay: Duration::from_secs(2),
        }
    }

    /// Override the courtesy delays. Tests set these to zero.
    #[must_use]
    pub fn with_delays(mut self, listing_delay: Duration, page_delay: Duration) -> Self {
        self.listing_delay = listing_delay;
        self.page_delay = page_delay;
        self
    }

    /// Run the collection stage: every page, every capped listing.
    ///
    /// Returns only records classified as available, each tagged with its
    /// 1-based page index. An empty list is a valid outcome.
    pub async fn collect(&self) -> Vec<ProductRecord> {
        let mut records = Vec::new();

        for page in 1..=self.criteria.max_pages {
            info!(page, max_pages = self.criteria.max_pages, "fetching search results page");

            let search_url = format!(
                "{}/s?k={}&page={}",
                self.base_url, self.criteria.search_term, page
            );

            let body = match self.fetcher.fetch(&search_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(page, error = %e, "search page fetch failed, skipping page");
                    continue;
                }
            };

            let urls = listing_urls(&body, &self.base_url);

            for url in urls.iter().take(LISTINGS_PER_PAGE) {
                sleep(self.listing_delay).await;

                let listing_body = match self.fetcher.fetch(url).await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!(url, error = %e, "listing fetch failed, skipping listing");
                        continue;
                    }
                };

                let mut record =
                    extract_product(&listing_body, url, &self.criteria.monetization_tag);

                if record.is_available {
                    record.page_index = page;
                    info!(title = %truncated(&record.title), "found available listing");
                    records.push(record);
                }
            }

            sleep(self.page_delay).await;
        }

        records
    }
}

/// Absolute, deduplicated product-detail URLs found on a search page.
///
/// Deduplication keeps first-seen document order.
#[must_use]
pub fn listing_urls(search_page_html: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            warn!(base_url, error = %e, "invalid base URL");
            return Vec::new();
        }
    };

    let doc = Html::parse_document(search_page_html);
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for anchor in doc.select(&PRODUCT_LINKS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains("/dp/") {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let absolute = resolved.to_string();
        if seen.insert(absolute.clone()) {
            urls.push(absolute);
        }
    }

    urls
}

fn truncated(title: &str) -> &str {
    let end = title
        .char_indices()
        .nth(50)
        .map_or(title.len(), |(i, _)| i);
    &title[..end]
}

//! Application layer: discovery-run orchestration, publishing, bot, scheduler.

pub mod format;
pub mod publisher;
pub mod scheduler;

#[cfg(feature = "telegram")]
pub mod bot;

use tracing::info;

use crate::config::ScraperConfig;
use crate::domain::criteria::FilterCriteria;
use crate::domain::product::Deal;
use crate::domain::ranking;
use crate::port::Fetcher;
use crate::scrape::CollectionPipeline;

/// Deals retained after ranking.
const MAX_DEALS: usize = 20;

/// Result of one discovery run.
///
/// An empty `deals` list is a valid outcome, distinct from failure; the
/// caller decides how to present it.
#[derive(Debug)]
pub struct DiscoveryOutcome {
    /// Available listings collected before filtering.
    pub scraped: usize,
    /// Ranked deals, best first, capped at the retention limit.
    pub deals: Vec<Deal>,
}

/// Run one end-to-end discovery: collect, rank, project.
///
/// Each invocation builds its own pipeline from its own criteria and
/// shares no mutable state with concurrent runs.
pub async fn run_discovery(
    fetcher: &dyn Fetcher,
    scraper: &ScraperConfig,
    criteria: &FilterCriteria,
) -> DiscoveryOutcome {
    info!(
        search_term = %criteria.search_term,
        max_pages = criteria.max_pages,
        min_discount = criteria.min_discount_percent,
        "starting discovery run"
    );

    let pipeline = CollectionPipeline::new(fetcher, criteria, scraper.base_url.clone())
        .with_delays(
            std::time::Duration::from_millis(scraper.listing_delay_ms),
            std::time::Duration::from_millis(scraper.page_delay_ms),
        );

    let records = pipeline.collect().await;
    let scraped = records.len();

    let deals: Vec<Deal> = ranking::rank(records, criteria)
        .iter()
        .take(MAX_DEALS)
        .map(|(record, score)| Deal::from_record(record, *score))
        .collect();

    info!(scraped, deals = deals.len(), "discovery run finished");

    DiscoveryOutcome { scraped, deals }
}

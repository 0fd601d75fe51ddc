//! Listing collection and extraction: the scrape side of a discovery run.

pub mod availability;
pub mod extract;
pub mod link;
pub mod pipeline;

pub use availability::is_available;
pub use extract::extract_product;
pub use link::monetize_url;
pub use pipeline::{listing_urls, CollectionPipeline, LISTINGS_PER_PAGE};

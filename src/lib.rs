//! Dealhound - discounted-listing discovery, ranking, and channel publishing.
//!
//! This crate scrapes an e-commerce site for discounted listings, scores
//! them with a composite deal heuristic, and publishes the best ones to a
//! Telegram channel on demand or on a daily schedule.
//!
//! # Architecture
//!
//! The pipeline follows a ports-and-adapters layout:
//!
//! - **`domain`** - Records, filter criteria, price normalization, ranking
//! - **`scrape`** - Availability classification, field extraction, affiliate
//!   link rewriting, and the paginated collection pipeline
//! - **`port`** - `Fetcher` and `Publisher` traits the core depends on
//! - **`adapter`** - reqwest fetcher, teloxide publisher, CSV export
//! - **`app`** - Discovery orchestration, publish flow, bot, scheduler
//!
//! # Modules
//!
//! - [`config`] - TOML + environment configuration with working defaults
//! - [`error`] - Error taxonomy for the crate
//! - [`retry`] - Bounded exponential-backoff policy for channel sends
//!
//! # Features
//!
//! - `telegram` - Telegram bot and channel publishing (default)
//!
//! # Example
//!
//! ```no_run
//! use dealhound::adapter::HttpFetcher;
//! use dealhound::app::run_discovery;
//! use dealhound::config::Config;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("config.toml")?;
//! let fetcher = HttpFetcher::new()?;
//! let outcome = run_discovery(&fetcher, &config.scraper, &config.default_criteria()).await;
//! println!("{} deals", outcome.deals.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod retry;
pub mod scrape;

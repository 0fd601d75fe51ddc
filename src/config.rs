//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values like `TELEGRAM_BOT_TOKEN`. Every section
//! has working defaults so a missing config file still yields a usable
//! configuration.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::criteria::FilterCriteria;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`]; a missing file falls back
/// to defaults so the bot can run from environment variables alone.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Scraper defaults applied when a run supplies no overrides.
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Telegram bot and channel settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Scheduled category sweep settings.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = match fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::parse_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(ConfigError::ReadFile(e).into()),
        };

        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Overlay secrets and operator overrides from the environment.
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Ok(raw) = std::env::var("CHANNEL_ID") {
            if let Ok(id) = raw.parse() {
                self.telegram.channel_id = Some(id);
            }
        }
        if let Ok(tag) = std::env::var("AFFILIATE_TAG") {
            self.scraper.affiliate_tag = tag;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scraper.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraper.max_pages",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.scraper.min_budget > self.scraper.max_budget {
            return Err(ConfigError::InvalidValue {
                field: "scraper.min_budget",
                reason: format!(
                    "min_budget {} exceeds max_budget {}",
                    self.scraper.min_budget, self.scraper.max_budget
                ),
            }
            .into());
        }
        if self.scraper.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "scraper.base_url",
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with the configured logging settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Filter criteria built from the configured scraper defaults.
    #[must_use]
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.scraper.search_term.clone(),
            max_pages: self.scraper.max_pages,
            min_discount_percent: self.scraper.min_discount,
            min_review_count: self.scraper.min_review_count,
            min_budget: self.scraper.min_budget,
            max_budget: self.scraper.max_budget,
            monetization_tag: self.scraper.affiliate_tag.clone(),
        }
    }
}

/// Scraper defaults and site parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Site root used for search URLs and relative link resolution.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default search term when a run supplies none.
    #[serde(default = "default_search_term")]
    pub search_term: String,
    /// Result pages fetched per run.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Minimum discount percentage a deal must reach.
    #[serde(default = "default_min_discount")]
    pub min_discount: f64,
    /// Minimum review count a deal must reach.
    #[serde(default = "default_min_review_count")]
    pub min_review_count: u64,
    /// Lower bound of the price band, inclusive.
    #[serde(default = "default_min_budget")]
    pub min_budget: f64,
    /// Upper bound of the price band, inclusive.
    #[serde(default = "default_max_budget")]
    pub max_budget: f64,
    /// Affiliate tag appended to rewritten product links. Empty disables rewriting.
    #[serde(default = "default_affiliate_tag")]
    pub affiliate_tag: String,
    /// Courtesy delay before each listing fetch, in milliseconds.
    #[serde(default = "default_listing_delay_ms")]
    pub listing_delay_ms: u64,
    /// Courtesy delay after each result page, in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

fn default_base_url() -> String {
    "https://www.amazon.in".into()
}

fn default_search_term() -> String {
    "laptop".into()
}

const fn default_max_pages() -> u32 {
    3
}

const fn default_min_discount() -> f64 {
    15.0
}

const fn default_min_review_count() -> u64 {
    50
}

const fn default_min_budget() -> f64 {
    20_000.0
}

const fn default_max_budget() -> f64 {
    150_000.0
}

fn default_affiliate_tag() -> String {
    "dip090-21".into()
}

const fn default_listing_delay_ms() -> u64 {
    1_000
}

const fn default_page_delay_ms() -> u64 {
    2_000
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_term: default_search_term(),
            max_pages: default_max_pages(),
            min_discount: default_min_discount(),
            min_review_count: default_min_review_count(),
            min_budget: default_min_budget(),
            max_budget: default_max_budget(),
            affiliate_tag: default_affiliate_tag(),
            listing_delay_ms: default_listing_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

/// Telegram bot and channel settings.
///
/// The token and channel id normally arrive via `TELEGRAM_BOT_TOKEN` and
/// `CHANNEL_ID` environment variables rather than the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Target channel for published deals. None disables channel posting.
    #[serde(default)]
    pub channel_id: Option<i64>,
    /// Deals shown to the requesting user and posted to the channel.
    #[serde(default = "default_top_deals")]
    pub top_deals: usize,
}

const fn default_top_deals() -> usize {
    5
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: None,
            top_deals: default_top_deals(),
        }
    }
}

/// One scheduled sweep category with its own discount floor.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub min_discount: f64,
}

/// Scheduled category sweep settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// Wall-clock time of day for the daily sweep, `HH:MM`.
    #[serde(default = "default_sweep_time")]
    pub time: String,
    /// Pause between categories, in seconds.
    #[serde(default = "default_category_pause_secs")]
    pub category_pause_secs: u64,
    /// Categories swept in order each tick.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

fn default_sweep_time() -> String {
    "00:00".into()
}

const fn default_category_pause_secs() -> u64 {
    10
}

fn default_categories() -> Vec<CategoryConfig> {
    [
        ("fashion", 15.0),
        ("electronics", 20.0),
        ("home", 10.0),
        ("sports", 15.0),
        ("books", 10.0),
    ]
    .into_iter()
    .map(|(name, min_discount)| CategoryConfig {
        name: name.into(),
        min_discount,
    })
    .collect()
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            time: default_sweep_time(),
            category_pause_secs: default_category_pause_secs(),
            categories: default_categories(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.scraper.search_term, "laptop");
        assert_eq!(config.scraper.max_pages, 3);
        assert_eq!(config.sweep.categories.len(), 5);
        assert_eq!(config.telegram.top_deals, 5);
    }

    #[test]
    fn parses_partial_toml() {
        let config = Config::parse_toml(
            r#"
[scraper]
search_term = "headphones"
min_discount = 30.0

[logging]
level = "debug"
format = "json"
"#,
        )
        .expect("parse");

        assert_eq!(config.scraper.search_term, "headphones");
        assert_eq!(config.scraper.min_discount, 30.0);
        // Unspecified fields keep their defaults.
        assert_eq!(config.scraper.max_pages, 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_logging_table_keeps_default_format() {
        let config = Config::parse_toml(
            r#"
[logging]
level = "debug"
"#,
        )
        .expect("parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn rejects_inverted_budget_band() {
        let mut config = Config::default();
        config.scraper.min_budget = 10_000.0;
        config.scraper.max_budget = 5_000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_criteria_mirror_scraper_section() {
        let config = Config::default();
        let criteria = config.default_criteria();
        assert_eq!(criteria.search_term, config.scraper.search_term);
        assert_eq!(criteria.min_discount_percent, config.scraper.min_discount);
        assert_eq!(criteria.monetization_tag, config.scraper.affiliate_tag);
    }
}

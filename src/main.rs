use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use dealhound::adapter::{csv, HttpFetcher};
use dealhound::app::run_discovery;
use dealhound::app::scheduler::SweepRunner;
use dealhound::config::Config;
#[cfg(feature = "telegram")]
use dealhound::port::Publisher;

#[derive(Parser)]
#[command(name = "dealhound", version, about = "Deal discovery and channel publishing")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Telegram bot with the daily sweep scheduler.
    #[cfg(feature = "telegram")]
    Bot,

    /// Run one discovery and export the ranked deals to CSV.
    Scrape {
        /// Search term, overriding the configured default.
        #[arg(long)]
        term: Option<String>,
        /// Result pages to fetch.
        #[arg(long)]
        max_pages: Option<u32>,
        /// Minimum discount percentage.
        #[arg(long)]
        min_discount: Option<f64>,
        /// Minimum review count.
        #[arg(long)]
        min_reviews: Option<u64>,
        /// Lower price bound, inclusive.
        #[arg(long)]
        min_budget: Option<f64>,
        /// Upper price bound, inclusive.
        #[arg(long)]
        max_budget: Option<f64>,
        /// Output CSV path; defaults to a timestamped filename.
        #[arg(long)]
        out: Option<String>,
    },

    /// Run one configured category sweep immediately.
    Sweep {
        /// Category name; must appear in the sweep configuration.
        #[arg(long)]
        category: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = Config::load(&cli.config).context("failed to load config")?;
    config.init_logging();

    match cli.command {
        #[cfg(feature = "telegram")]
        Command::Bot => run_bot(config).await,
        Command::Scrape {
            term,
            max_pages,
            min_discount,
            min_reviews,
            min_budget,
            max_budget,
            out,
        } => {
            let mut criteria = config.default_criteria();
            if let Some(term) = term {
                criteria.search_term = term;
            }
            if let Some(pages) = max_pages {
                criteria.max_pages = pages;
            }
            if let Some(discount) = min_discount {
                criteria.min_discount_percent = discount;
            }
            if let Some(reviews) = min_reviews {
                criteria.min_review_count = reviews;
            }
            if let Some(budget) = min_budget {
                criteria.min_budget = budget;
            }
            if let Some(budget) = max_budget {
                criteria.max_budget = budget;
            }

            run_scrape(config, criteria, out).await
        }
        Command::Sweep { category } => run_sweep(config, &category).await,
    }
}

#[cfg(feature = "telegram")]
async fn run_bot(config: Config) -> anyhow::Result<()> {
    use dealhound::adapter::TelegramPublisher;
    use dealhound::app::bot::DealsBot;
    use std::sync::Arc;
    use teloxide::Bot;
    use tokio::signal;
    use tracing::{error, info};

    let config = Arc::new(config);
    let bot = DealsBot::new(Arc::clone(&config))?;

    // The scheduler shares nothing with the bot beyond config; give it its
    // own fetcher and channel handle.
    let scheduler_config = Arc::clone(&config);
    let scheduler = tokio::spawn(async move {
        let fetcher = match HttpFetcher::new() {
            Ok(fetcher) => fetcher,
            Err(e) => {
                error!(error = %e, "scheduler HTTP client failed to build");
                return;
            }
        };

        let publisher = scheduler_config
            .telegram
            .bot_token
            .as_deref()
            .zip(scheduler_config.telegram.channel_id)
            .map(|(token, channel_id)| TelegramPublisher::new(Bot::new(token), channel_id));

        let publisher_ref = publisher.as_ref().map(|p| p as &dyn Publisher);
        SweepRunner::new(&scheduler_config, &fetcher, publisher_ref)
            .run_daily()
            .await;
    });

    info!("dealhound starting");

    tokio::select! {
        _ = bot.run() => {}
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    scheduler.abort();
    info!("dealhound stopped");
    Ok(())
}

async fn run_scrape(
    config: Config,
    criteria: dealhound::domain::FilterCriteria,
    out: Option<String>,
) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let outcome = run_discovery(&fetcher, &config.scraper, &criteria).await;

    if outcome.deals.is_empty() {
        println!(
            "No deals matched ({} available listings scraped).",
            outcome.scraped
        );
        return Ok(());
    }

    for (i, deal) in outcome.deals.iter().enumerate() {
        println!(
            "{:>2}. [{:>5.1} pts] {:.0}% off  ₹{:<10.0} {}",
            i + 1,
            deal.deal_score,
            deal.discount_percent,
            deal.current_price,
            deal.title,
        );
    }

    let path = out.unwrap_or_else(csv::default_filename);
    csv::write_deals(&outcome.deals, &path).context("failed to write CSV")?;
    println!("\n{} deals written to {path}", outcome.deals.len());

    Ok(())
}

async fn run_sweep(config: Config, category: &str) -> anyhow::Result<()> {
    let Some(category) = config
        .sweep
        .categories
        .iter()
        .find(|c| c.name == category)
        .cloned()
    else {
        bail!("category '{category}' is not configured");
    };

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;

    #[cfg(feature = "telegram")]
    {
        use dealhound::adapter::TelegramPublisher;
        use teloxide::Bot;

        let publisher = config
            .telegram
            .bot_token
            .as_deref()
            .zip(config.telegram.channel_id)
            .map(|(token, channel_id)| TelegramPublisher::new(Bot::new(token), channel_id));

        let publisher_ref = publisher.as_ref().map(|p| p as &dyn Publisher);
        SweepRunner::new(&config, &fetcher, publisher_ref)
            .run_category(&category)
            .await;
    }

    #[cfg(not(feature = "telegram"))]
    {
        SweepRunner::new(&config, &fetcher, None)
            .run_category(&category)
            .await;
    }

    Ok(())
}

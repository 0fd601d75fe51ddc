//! Telegram command interface.
//!
//! Handles `/start`, `/help`, and `/deals key=value ...`. A `/deals` run
//! reports each phase back to the requesting chat, shows the top deals,
//! then publishes them to the configured channel. Runs take as long as
//! they take; there is no timeout on discovery.
//!
//! Requires the `telegram` feature.

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::time::sleep;
use tracing::{error, info};

use crate::adapter::{HttpFetcher, TelegramPublisher};
use crate::config::Config;
use crate::domain::criteria::parse_override_args;
use crate::error::{ConfigError, Result};

use super::format;
use super::publisher::ChannelPublisher;
use super::run_discovery;

/// Pause between top-deal messages to the requesting user.
const REPLY_DELAY: Duration = Duration::from_millis(500);

/// The interactive deals bot.
pub struct DealsBot {
    bot: Bot,
    config: Arc<Config>,
    fetcher: Arc<HttpFetcher>,
}

impl DealsBot {
    /// Build the bot from configuration.
    ///
    /// Fails when no bot token is configured or the HTTP client cannot be
    /// constructed.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let token = config
            .telegram
            .bot_token
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "telegram.bot_token",
            })?;

        let fetcher = HttpFetcher::new().map_err(|e| ConfigError::InvalidValue {
            field: "telegram",
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            bot: Bot::new(token),
            config,
            fetcher: Arc::new(fetcher),
        })
    }

    /// Listen for commands until the process is stopped.
    pub async fn run(self) {
        info!("deals bot starting");

        let config = self.config;
        let fetcher = self.fetcher;

        teloxide::repl(self.bot, move |bot: Bot, msg: Message| {
            let config = Arc::clone(&config);
            let fetcher = Arc::clone(&fetcher);

            async move {
                let Some(text) = msg.text() else {
                    return respond(());
                };

                let chat_id = msg.chat.id;
                match command_of(text) {
                    Some(("start", _)) => {
                        reply(&bot, chat_id, &start_message(&config)).await;
                    }
                    Some(("help", _)) => {
                        reply(&bot, chat_id, HELP_MESSAGE).await;
                    }
                    Some(("deals", args)) => {
                        handle_deals(&bot, chat_id, &config, fetcher.as_ref(), args).await;
                    }
                    _ => {}
                }

                respond(())
            }
        })
        .await;
    }
}

/// Split a `/command arg...` message, tolerating a `@botname` suffix.
fn command_of(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let command = head.split('@').next().unwrap_or(head);
    Some((command, args))
}

/// The whole `/deals` flow: overrides, discovery, replies, channel post.
async fn handle_deals(
    bot: &Bot,
    chat_id: ChatId,
    config: &Config,
    fetcher: &HttpFetcher,
    args: &str,
) {
    reply(
        bot,
        chat_id,
        "🔍 Starting comprehensive deal search... This will take as long as needed!",
    )
    .await;

    let words: Vec<&str> = args.split_whitespace().collect();
    let overrides = parse_override_args(&words);

    let mut criteria = config.default_criteria();
    criteria.apply_overrides(&overrides);

    reply(bot, chat_id, &format::filter_summary(&criteria)).await;
    reply(bot, chat_id, "📦 Phase 1: Product Discovery").await;

    let outcome = run_discovery(fetcher, &config.scraper, &criteria).await;

    if outcome.scraped == 0 {
        reply(bot, chat_id, "❌ No products found. Try different filters.").await;
        return;
    }

    reply(
        bot,
        chat_id,
        &format!(
            "✅ Phase 1 Complete: Found {} products\n📊 Phase 2: Filtering and ranking",
            outcome.scraped
        ),
    )
    .await;

    if outcome.deals.is_empty() {
        reply(
            bot,
            chat_id,
            "❌ No deals match your criteria. Consider lowering requirements.",
        )
        .await;
        return;
    }

    let top = &outcome.deals[..outcome.deals.len().min(config.telegram.top_deals)];

    reply(bot, chat_id, &format!("🏆 TOP {} DEALS:", top.len())).await;
    for (i, deal) in top.iter().enumerate() {
        reply(bot, chat_id, &format::deal_message(deal, i + 1)).await;
        sleep(REPLY_DELAY).await;
    }

    if let Some(channel_id) = config.telegram.channel_id {
        reply(bot, chat_id, "📤 Phase 3: Channel Publishing...").await;

        let publisher = TelegramPublisher::new(bot.clone(), channel_id);
        let summary = ChannelPublisher::new(&publisher)
            .publish_deals(top, &criteria.search_term)
            .await;

        let confirmation = if summary.all_sent() {
            "✅ Successfully posted to channel!".to_string()
        } else {
            format!(
                "⚠️ Channel publishing incomplete: {} sent, {} failed.",
                summary.sent, summary.failed
            )
        };
        reply(bot, chat_id, &confirmation).await;
    }

    reply(bot, chat_id, "🎉 Mission Complete!").await;
}

/// Send one HTML reply, logging failures instead of propagating them.
async fn reply(bot: &Bot, chat_id: ChatId, text: &str) {
    if let Err(e) = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await
    {
        error!(error = %e, "failed to send bot reply");
    }
}

fn start_message(config: &Config) -> String {
    format!(
        "🛒 <b>Amazon Deals Bot</b> 🛒\n\n\
         <b>Commands:</b>\n\
         /deals - Run a deal search\n\
         /help - Detailed help\n\n\
         <b>Current Settings:</b>\n\
         • Search: {term}\n\
         • Min Discount: {discount}%\n\
         • Pages: {pages}\n\n\
         Ready for deal hunting! 🚀",
        term = format::escape_html(&config.scraper.search_term),
        discount = config.scraper.min_discount,
        pages = config.scraper.max_pages,
    )
}

const HELP_MESSAGE: &str = "🆘 <b>Deals Bot Help</b>\n\n\
     <b>Main Command:</b>\n\
     /deals - Run a deal search\n\n\
     <b>Parameters:</b>\n\
     • search_term=VALUE\n\
     • min_discount=VALUE\n\
     • max_pages=VALUE\n\
     • min_budget=VALUE\n\
     • max_budget=VALUE\n\
     • min_review_count=VALUE\n\n\
     <b>Examples:</b>\n\
     • /deals search_term=smartphone\n\
     • /deals search_term=laptop min_discount=30 max_pages=10\n\
     • /deals min_discount=50 min_budget=20000\n\n\
     Unrecognized values fall back to the configured defaults.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_command_and_args() {
        assert_eq!(command_of("/deals a=1 b=2"), Some(("deals", "a=1 b=2")));
        assert_eq!(command_of("/start"), Some(("start", "")));
        assert_eq!(command_of("not a command"), None);
    }

    #[test]
    fn strips_bot_name_suffix() {
        assert_eq!(
            command_of("/deals@dealhound_bot min_discount=20"),
            Some(("deals", "min_discount=20"))
        );
    }
}

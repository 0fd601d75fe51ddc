//! teloxide-backed channel publisher.
//!
//! Requires the `telegram` feature. Messages are sent as HTML with link
//! previews left on so product cards render in the channel.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::error::PublishError;
use crate::port::Publisher;

/// Publishes messages to one Telegram chat or channel.
pub struct TelegramPublisher {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramPublisher {
    #[must_use]
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(|e| PublishError::Send(e.to_string()))
    }
}

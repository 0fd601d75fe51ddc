//! Ranked publish flow to the messaging channel.
//!
//! Header, deals in rank order, then footer. Each message is retried
//! independently under the backoff policy; one exhausted message is
//! counted and reported but never aborts the remaining sends.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};

use crate::domain::product::Deal;
use crate::port::Publisher;
use crate::retry::{retry_publish, RetryPolicy};

use super::format;

/// Pause between consecutive deal messages.
const MESSAGE_DELAY: Duration = Duration::from_millis(1_500);

/// Outcome of one channel publish flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub sent: usize,
    pub failed: usize,
}

impl PublishSummary {
    #[must_use]
    pub fn all_sent(&self) -> bool {
        self.failed == 0
    }
}

/// Serializes channel sends in rank order with bounded retries.
pub struct ChannelPublisher<'a> {
    publisher: &'a dyn Publisher,
    retry: RetryPolicy,
    message_delay: Duration,
}

impl<'a> ChannelPublisher<'a> {
    #[must_use]
    pub fn new(publisher: &'a dyn Publisher) -> Self {
        Self {
            publisher,
            retry: RetryPolicy::default(),
            message_delay: MESSAGE_DELAY,
        }
    }

    /// Override retry policy and inter-message delay. Tests zero these.
    #[must_use]
    pub fn with_policy(mut self, retry: RetryPolicy, message_delay: Duration) -> Self {
        self.retry = retry;
        self.message_delay = message_delay;
        self
    }

    /// Publish the header, each deal in rank order, then the footer.
    ///
    /// Failures are independent: an exhausted header does not stop the
    /// deals, and one failed deal does not stop the next.
    pub async fn publish_deals(&self, deals: &[Deal], search_term: &str) -> PublishSummary {
        let mut summary = PublishSummary { sent: 0, failed: 0 };

        self.send(&format::channel_header(search_term, deals.len()), &mut summary)
            .await;

        for (i, deal) in deals.iter().enumerate() {
            self.send(&format::channel_deal_message(deal, i + 1), &mut summary)
                .await;
            sleep(self.message_delay).await;
        }

        self.send(&format::channel_footer(search_term), &mut summary)
            .await;

        info!(
            sent = summary.sent,
            failed = summary.failed,
            "channel publish flow finished"
        );
        summary
    }

    async fn send(&self, text: &str, summary: &mut PublishSummary) {
        match retry_publish(self.retry, || self.publisher.publish(text)).await {
            Ok(()) => summary.sent += 1,
            Err(e) => {
                error!(error = %e, "channel message dropped after retries");
                summary.failed += 1;
            }
        }
    }
}

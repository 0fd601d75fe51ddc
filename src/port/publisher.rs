//! Publisher port for the messaging channel.

use async_trait::async_trait;

use crate::error::PublishError;

/// Sends one message to the configured channel.
///
/// Delivery is best-effort; retry policy lives with the caller, not the
/// implementation. Never assume exactly-once delivery.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send `text` to the channel.
    async fn publish(&self, text: &str) -> Result<(), PublishError>;
}

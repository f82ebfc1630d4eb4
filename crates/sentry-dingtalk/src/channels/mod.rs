//! Notification channel implementations.

pub mod dingtalk;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::ChatMessage;

/// Trait for robot webhook channels.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Deliver `message` to the robot identified by `access_token`.
    async fn send(&self, access_token: &str, message: &ChatMessage) -> Result<(), ChannelError>;
}

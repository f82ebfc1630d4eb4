//! Host-facing plugin surface.
//!
//! The error tracker drives the plugin through [`NotificationPlugin`]. The
//! [`DingTalkPlugin`] implementation additionally exposes the entry points
//! the host pipeline calls per occurrence, resolving configuration through
//! a [`ConfigProvider`].

use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;
use tracing::debug;

use crate::channels::dingtalk::DingTalkChannel;
use crate::channels::NotifyChannel;
use crate::config::{ConfigProvider, PluginConfig};
use crate::error::ChannelError;
use crate::events::{EventRecord, GroupRecord, Notification};
use crate::message::format_message;

/// Static plugin metadata shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub author_url: &'static str,
    pub version: &'static str,
    pub resource_links: &'static [(&'static str, &'static str)],
}

pub const PLUGIN: PluginInfo = PluginInfo {
    slug: "DingDing",
    title: "DingDing",
    description: "Send error counts to DingDing.",
    author: "ansheng",
    author_url: "https://github.com/anshengme/sentry-dingding",
    version: env!("CARGO_PKG_VERSION"),
    resource_links: &[
        ("Source", "https://github.com/anshengme/sentry-dingding"),
        (
            "Bug Tracker",
            "https://github.com/anshengme/sentry-dingding/issues",
        ),
        (
            "README",
            "https://github.com/anshengme/sentry-dingding/blob/master/README.md",
        ),
    ],
};

/// Contract between the host and a notification plugin.
#[async_trait]
pub trait NotificationPlugin: Send + Sync {
    /// Whether delivery is enabled for `config`.
    fn is_configured(&self, config: &PluginConfig) -> bool;

    /// Format and deliver one notification.
    ///
    /// Returns `Ok(())` without any network traffic when `config` is not
    /// configured. Transport failures are returned to the caller.
    async fn notify(
        &self,
        group: &GroupRecord,
        event: &EventRecord,
        config: &PluginConfig,
    ) -> Result<(), ChannelError>;
}

/// DingTalk notification plugin.
pub struct DingTalkPlugin<P> {
    channel: Arc<dyn NotifyChannel>,
    provider: P,
}

impl<P: ConfigProvider> DingTalkPlugin<P> {
    /// Create a plugin posting to the public DingTalk endpoint.
    pub fn new(provider: P) -> Result<Self, ChannelError> {
        Ok(Self::with_channel(Arc::new(DingTalkChannel::new()?), provider))
    }

    /// Create a plugin with a specific channel.
    #[must_use]
    pub fn with_channel(channel: Arc<dyn NotifyChannel>, provider: P) -> Self {
        Self { channel, provider }
    }

    #[must_use]
    pub const fn info(&self) -> &'static PluginInfo {
        &PLUGIN
    }

    /// Configuration stored for `project_id`.
    pub fn config_for(&self, project_id: &str) -> PluginConfig {
        PluginConfig::load(&self.provider, project_id)
    }

    /// Whether the integration is active for `project_id`.
    pub fn is_project_configured(&self, project_id: &str) -> bool {
        self.is_configured(&self.config_for(project_id))
    }

    /// Pipeline entry point, called once per new occurrence.
    pub async fn handle(&self, notification: &Notification) -> Result<(), ChannelError> {
        self.notify_users(&notification.group, &notification.event)
            .await
    }

    pub async fn notify_users(
        &self,
        group: &GroupRecord,
        event: &EventRecord,
    ) -> Result<(), ChannelError> {
        self.post_process(group, event).await
    }

    /// Resolve the group's project configuration and deliver.
    pub async fn post_process(
        &self,
        group: &GroupRecord,
        event: &EventRecord,
    ) -> Result<(), ChannelError> {
        let config = self.config_for(&group.project_id);
        self.notify(group, event, &config).await
    }
}

#[async_trait]
impl<P: ConfigProvider> NotificationPlugin for DingTalkPlugin<P> {
    fn is_configured(&self, config: &PluginConfig) -> bool {
        config.is_configured()
    }

    async fn notify(
        &self,
        group: &GroupRecord,
        event: &EventRecord,
        config: &PluginConfig,
    ) -> Result<(), ChannelError> {
        let Some(token) = config.token() else {
            debug!(
                project = %group.project_name,
                "DingTalk not configured, skipping notification"
            );
            return Ok(());
        };

        let message = format_message(group, event, Local::now().time());

        debug!(
            channel = self.channel.name(),
            project = %group.project_name,
            level = group.level.as_str(),
            title = %message.title,
            "Dispatching notification"
        );

        self.channel.send(token, &message).await
    }
}

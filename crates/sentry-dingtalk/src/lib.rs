//! DingTalk notifications for error-tracker issues.
//!
//! This crate formats a new issue occurrence as a DingTalk markdown
//! message and posts it to the robot webhook of the project's configured
//! access token. Delivery is a single best-effort request with no retry.
//!
//! # Usage
//!
//! ```no_run
//! use sentry_dingtalk::{DingTalkPlugin, EventRecord, GroupRecord, Level, MemoryConfig, Notification};
//!
//! # async fn run() -> Result<(), sentry_dingtalk::ChannelError> {
//! let config = MemoryConfig::new().with_token("42", "robot-access-token");
//! let plugin = DingTalkPlugin::new(config)?;
//!
//! plugin
//!     .handle(&Notification {
//!         group: GroupRecord {
//!             level: Level::Error,
//!             absolute_url: "https://sentry.example.com/demo/issues/1/".to_string(),
//!             project_name: "demo".to_string(),
//!             project_id: "42".to_string(),
//!         },
//!         event: EventRecord::new("division by zero", "ZeroDivisionError")
//!             .with_tag("server_name", "web-1"),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Each project carries a single option, `access_token`. When it is
//! missing or empty the plugin does nothing. [`EnvConfig`] reads it from
//! `DINGTALK_ACCESS_TOKEN` for every project.
//!
//! # Architecture
//!
//! - [`NotificationPlugin`] is the contract the host drives
//! - [`format_message`] renders the markdown message, free of I/O
//! - [`NotifyChannel`] delivers it; [`DingTalkChannel`] posts to the webhook

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod plugin;

pub use channels::dingtalk::DingTalkChannel;
pub use channels::NotifyChannel;
pub use config::{
    config_fields, ConfigField, ConfigProvider, EnvConfig, MemoryConfig, PluginConfig,
    DINGTALK_API,
};
pub use error::ChannelError;
pub use events::{EventRecord, GroupRecord, Level, Notification};
pub use message::{format_message, ChatMessage};
pub use plugin::{DingTalkPlugin, NotificationPlugin, PluginInfo, PLUGIN};

//! dingtalk-notify - preview or send an issue notification by hand.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sentry_dingtalk::events::{TAG_IPS, TAG_SERVER_NAME};
use sentry_dingtalk::{
    config_fields, format_message, ConfigProvider, DingTalkChannel, DingTalkPlugin, EnvConfig,
    EventRecord, GroupRecord, Level, MemoryConfig, Notification, DINGTALK_API, PLUGIN,
};

/// Send error-tracker issue notifications to a DingTalk robot.
#[derive(Parser)]
#[command(name = "dingtalk-notify")]
#[command(about = "Preview or send DingTalk issue notifications")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the webhook JSON payload without sending it
    Preview {
        #[command(flatten)]
        message: MessageArgs,
    },

    /// Format and send a notification
    Send {
        /// Robot access token (falls back to DINGTALK_ACCESS_TOKEN)
        #[arg(long)]
        access_token: Option<String>,

        /// Webhook endpoint
        #[arg(long, env = "DINGTALK_ENDPOINT", default_value = DINGTALK_API)]
        endpoint: String,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Show plugin metadata and settings fields
    Info,
}

#[derive(Args)]
struct MessageArgs {
    /// Project name
    #[arg(long)]
    project: String,

    /// Event metadata type (exception class)
    #[arg(long = "type")]
    kind: String,

    /// Issue level
    #[arg(long, default_value = "error")]
    level: Level,

    /// Error message
    #[arg(long)]
    message: String,

    /// Reporting server name
    #[arg(long)]
    server: Option<String>,

    /// Reporting host addresses
    #[arg(long)]
    ips: Option<String>,

    /// Issue permalink
    #[arg(long)]
    url: String,
}

impl MessageArgs {
    fn records(self) -> (GroupRecord, EventRecord) {
        let group = GroupRecord {
            level: self.level,
            absolute_url: self.url,
            project_id: self.project.clone(),
            project_name: self.project,
        };

        let mut event = EventRecord::new(self.message, self.kind);
        if let Some(server) = self.server {
            event = event.with_tag(TAG_SERVER_NAME, server);
        }
        if let Some(ips) = self.ips {
            event = event.with_tag(TAG_IPS, ips);
        }

        (group, event)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sentry_dingtalk=debug,dingtalk_notify=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Preview { message } => {
            let (group, event) = message.records();
            let message = format_message(&group, &event, Local::now().time());
            let payload = serde_json::to_string_pretty(&message.payload())?;
            println!("{payload}");
        }

        Commands::Send {
            access_token,
            endpoint,
            message,
        } => {
            let (group, event) = message.records();

            let provider: Box<dyn ConfigProvider> = match access_token {
                Some(token) => Box::new(MemoryConfig::new().with_token(&group.project_id, token)),
                None => Box::new(EnvConfig::from_env()),
            };

            let channel = DingTalkChannel::with_endpoint(&endpoint)
                .with_context(|| format!("invalid endpoint {endpoint}"))?;
            let plugin = DingTalkPlugin::with_channel(Arc::new(channel), provider);

            if !plugin.is_project_configured(&group.project_id) {
                info!("No access token configured, nothing sent");
                return Ok(());
            }

            let project = group.project_name.clone();
            plugin
                .handle(&Notification { group, event })
                .await
                .context("failed to deliver DingTalk notification")?;

            info!(project = %project, "Notification sent");
        }

        Commands::Info => {
            println!("{} {}", PLUGIN.title, PLUGIN.version);
            println!("{}", PLUGIN.description);
            println!("author: {} <{}>", PLUGIN.author, PLUGIN.author_url);
            for (name, link) in PLUGIN.resource_links {
                println!("{name}: {link}");
            }
            println!("{}", serde_json::to_string_pretty(config_fields())?);
        }
    }

    Ok(())
}

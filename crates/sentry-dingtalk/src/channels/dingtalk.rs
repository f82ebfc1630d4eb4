//! DingTalk robot webhook channel.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::config::{DINGTALK_API, OPTION_ACCESS_TOKEN, REQUEST_TIMEOUT};
use crate::error::ChannelError;
use crate::message::ChatMessage;
use crate::NotifyChannel;

/// DingTalk robot webhook channel.
#[derive(Debug, Clone)]
pub struct DingTalkChannel {
    endpoint: Url,
    client: reqwest::Client,
}

impl DingTalkChannel {
    /// Create a channel posting to the public DingTalk endpoint.
    pub fn new() -> Result<Self, ChannelError> {
        Self::with_endpoint(DINGTALK_API)
    }

    /// Create a channel posting to a custom endpoint.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client,
        })
    }

    /// Full webhook URL for `access_token`.
    ///
    /// The token is percent-encoded as a query value, so reserved characters
    /// such as `+` or `/` reach the server escaped. DingTalk tokens are hex
    /// and come out unchanged.
    pub fn send_url(&self, access_token: &str) -> Result<Url, ChannelError> {
        if access_token.is_empty() {
            return Err(ChannelError::NotConfigured(OPTION_ACCESS_TOKEN.to_string()));
        }

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(OPTION_ACCESS_TOKEN, access_token);
        Ok(url)
    }
}

#[async_trait]
impl NotifyChannel for DingTalkChannel {
    fn name(&self) -> &'static str {
        "dingtalk"
    }

    async fn send(&self, access_token: &str, message: &ChatMessage) -> Result<(), ChannelError> {
        let url = self.send_url(access_token)?;
        let body = message.to_json()?;

        debug!(channel = "dingtalk", title = %message.title, "Sending notification");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        // Delivery is best-effort: a rejected request is logged, not returned.
        let status = response.status();
        if status.is_success() {
            debug!(channel = "dingtalk", "Notification sent successfully");
        } else {
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "dingtalk",
                status = %status,
                body = %body,
                "DingTalk webhook request failed"
            );
        }

        Ok(())
    }
}

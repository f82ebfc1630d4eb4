//! Error types for DingTalk delivery.

use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed (DNS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel is not configured
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Endpoint is not a valid URL
    #[error("Invalid webhook endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

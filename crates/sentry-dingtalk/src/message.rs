//! DingTalk markdown message formatting.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::events::{EventRecord, GroupRecord};

/// DingTalk message type used for every notification.
pub const MSG_TYPE_MARKDOWN: &str = "markdown";

/// Rendered in place of a missing tag.
pub const MISSING_TAG: &str = "";

/// A chat message ready to be sent to a robot webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub title: String,
    pub text: String,
}

impl ChatMessage {
    #[must_use]
    pub const fn msg_type(&self) -> &'static str {
        MSG_TYPE_MARKDOWN
    }

    /// Wire representation of this message.
    #[must_use]
    pub fn payload(&self) -> DingTalkPayload {
        DingTalkPayload {
            msgtype: self.msg_type().to_string(),
            markdown: MarkdownContent {
                title: self.title.clone(),
                text: self.text.clone(),
            },
        }
    }

    /// UTF-8 JSON body for the webhook request.
    pub fn to_json(&self) -> Result<Vec<u8>, ChannelError> {
        Ok(serde_json::to_vec(&self.payload())?)
    }
}

/// Build the notification for one event.
///
/// `now` is the wall-clock time shown in the message; callers pass the
/// send-time local clock.
#[must_use]
pub fn format_message(group: &GroupRecord, event: &EventRecord, now: NaiveTime) -> ChatMessage {
    let project = &group.project_name;
    let kind = &event.metadata_type;
    let level = group.level_display();

    let title = format!("{project}:{kind}:{level}");
    let text = format!(
        "##### {project} \n > type: {kind} \n\n > level:{level} \n\n > time: {time} \n\n \
         > server: {server} \n\n > ip:{ips} \n\n > msg:{msg} \n\n >[view]({link})",
        time = now.format("%H:%M:%S"),
        server = event.server_name().unwrap_or(MISSING_TAG),
        ips = event.ips().unwrap_or(MISSING_TAG),
        msg = event.message,
        link = group.absolute_url,
    );

    ChatMessage { title, text }
}

// =============================================================================
// DingTalk API types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DingTalkPayload {
    pub msgtype: String,
    pub markdown: MarkdownContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownContent {
    pub title: String,
    pub text: String,
}

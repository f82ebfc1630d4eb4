//! Host records handed to the plugin by the error tracker.
//!
//! Host adapters translate their native event and group models into these
//! types before calling into the plugin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag carrying the reporting host name.
pub const TAG_SERVER_NAME: &str = "server_name";

/// Tag carrying the reporting host addresses.
pub const TAG_IPS: &str = "ips";

/// Severity level of an issue group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
    Fatal,
}

impl Level {
    /// Get the lowercase name for this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Get the uppercased label shown in chat messages.
    #[must_use]
    pub const fn display(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" | "critical" => Ok(Self::Fatal),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// One captured error occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Rendered error message.
    pub message: String,
    /// Event metadata type, usually the exception class.
    pub metadata_type: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl EventRecord {
    #[must_use]
    pub fn new(message: impl Into<String>, metadata_type: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            metadata_type: metadata_type.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Attach a tag, replacing any previous value.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Look up a tag value.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn server_name(&self) -> Option<&str> {
        self.tag(TAG_SERVER_NAME)
    }

    #[must_use]
    pub fn ips(&self) -> Option<&str> {
        self.tag(TAG_IPS)
    }
}

/// The deduplicated issue an event belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupRecord {
    pub level: Level,
    /// Permalink to the issue in the host UI.
    pub absolute_url: String,
    pub project_name: String,
    /// Opaque project identifier, used to look up per-project options.
    pub project_id: String,
}

impl GroupRecord {
    /// Uppercased severity label.
    #[must_use]
    pub const fn level_display(&self) -> &'static str {
        self.level.display()
    }
}

/// Envelope the host pipeline hands over for each new occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub group: GroupRecord,
    pub event: EventRecord,
}

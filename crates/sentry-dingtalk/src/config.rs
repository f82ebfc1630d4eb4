//! Per-project plugin configuration.
//!
//! The host stores plugin options per project; [`ConfigProvider`] is the
//! seam through which those options are read. Delivery is gated solely on
//! the presence of a non-empty access token.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// DingTalk robot webhook endpoint.
pub const DINGTALK_API: &str = "https://oapi.dingtalk.com/robot/send";

/// Upper bound on a single webhook request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Option key holding the robot access token.
pub const OPTION_ACCESS_TOKEN: &str = "access_token";

/// Environment variable for the access token.
pub const ENV_ACCESS_TOKEN: &str = "DINGTALK_ACCESS_TOKEN";

/// Plugin configuration for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl PluginConfig {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
        }
    }

    /// Resolve the configuration of `project_id` from the host's options.
    pub fn load(provider: &dyn ConfigProvider, project_id: &str) -> Self {
        Self {
            access_token: provider.option(OPTION_ACCESS_TOKEN, project_id),
        }
    }

    /// The access token, if one is set and non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.token().is_some()
    }
}

/// Read access to the host's per-project plugin options.
pub trait ConfigProvider: Send + Sync {
    /// Get the value of option `key` for `project_id`.
    fn option(&self, key: &str, project_id: &str) -> Option<String>;
}

/// In-memory option store keyed by project.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    projects: HashMap<String, HashMap<String, String>>,
}

impl MemoryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set option `key` for `project_id`.
    pub fn set(&mut self, project_id: &str, key: &str, value: impl Into<String>) {
        self.projects
            .entry(project_id.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Builder-style shorthand for setting a project's access token.
    #[must_use]
    pub fn with_token(mut self, project_id: &str, token: impl Into<String>) -> Self {
        self.set(project_id, OPTION_ACCESS_TOKEN, token);
        self
    }
}

impl ConfigProvider for MemoryConfig {
    fn option(&self, key: &str, project_id: &str) -> Option<String> {
        self.projects
            .get(project_id)
            .and_then(|options| options.get(key))
            .cloned()
    }
}

/// Options taken from the process environment, shared by every project.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    access_token: Option<String>,
}

impl EnvConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let access_token = std::env::var(ENV_ACCESS_TOKEN).ok();

        if access_token.is_some() {
            debug!("DingTalk access token loaded from {ENV_ACCESS_TOKEN}");
        } else {
            debug!("DingTalk notifications disabled ({ENV_ACCESS_TOKEN} not set)");
        }

        Self { access_token }
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Box<T> {
    fn option(&self, key: &str, project_id: &str) -> Option<String> {
        (**self).option(key, project_id)
    }
}

impl ConfigProvider for EnvConfig {
    fn option(&self, key: &str, _project_id: &str) -> Option<String> {
        if key == OPTION_ACCESS_TOKEN {
            self.access_token.clone()
        } else {
            None
        }
    }
}

/// One field of the project settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub help: &'static str,
    pub required: bool,
}

const CONFIG_FIELDS: &[ConfigField] = &[ConfigField {
    name: OPTION_ACCESS_TOKEN,
    label: "Access Token",
    placeholder: "e.g. 8e5a1c...",
    help: "The access_token query parameter of the DingTalk robot webhook URL",
    required: true,
}];

/// Fields a host settings UI should render for this plugin.
#[must_use]
pub const fn config_fields() -> &'static [ConfigField] {
    CONFIG_FIELDS
}

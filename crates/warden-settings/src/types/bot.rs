//! Bot behavior, chat platform, and policy settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Command handling and logging.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotSettings {
    /// Platform bot token.
    pub token: String,
    /// Command prefix, e.g. `!` for `!remove`.
    pub command_prefix: String,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// User ids or usernames allowed to run commands. `*` allows everyone.
    pub moderators: Vec<String>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            command_prefix: "!".to_string(),
            log_level: "info".to_string(),
            moderators: Vec::new(),
        }
    }
}

/// Discord REST endpoint and ingress listener.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscordSettings {
    /// REST API base URL.
    pub api_base: String,
    /// Ingress bind address.
    pub ingress_host: String,
    /// Ingress port.
    pub ingress_port: u16,
    /// Ingress route path.
    pub ingress_path: String,
    /// Shared secret expected in the ingress token header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_secret: Option<String>,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            api_base: "https://discord.com/api/v10".to_string(),
            ingress_host: "127.0.0.1".to_string(),
            ingress_port: 8787,
            ingress_path: "/discord/ingress".to_string(),
            ingress_secret: None,
        }
    }
}

/// Community policy text source.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    /// File replacing the built-in Code of Conduct template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,
}

impl PolicySettings {
    /// Read the configured template file, if any.
    pub fn load_template(&self) -> Result<Option<String>> {
        match &self.template_path {
            Some(path) => {
                tracing::debug!(?path, "loading policy template");
                Ok(Some(std::fs::read_to_string(path)?))
            }
            None => Ok(None),
        }
    }
}

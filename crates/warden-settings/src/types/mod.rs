//! Settings types.
//!
//! All structs use `camelCase` JSON and `#[serde(default)]`, so a partial
//! settings file fills the rest from compiled defaults.

mod bot;
mod model;

pub use bot::{BotSettings, DiscordSettings, PolicySettings};
pub use model::ModelSettings;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WardenSettings {
    /// Inference backend.
    pub model: ModelSettings,
    /// Command handling.
    pub bot: BotSettings,
    /// Chat platform adapter.
    pub discord: DiscordSettings,
    /// Policy template source.
    pub policy: PolicySettings,
}

impl WardenSettings {
    /// Reject settings the bot cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.bot.token.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "bot.token is empty (set DISCORD_TOKEN)".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(SettingsError::InvalidValue(format!(
                "model.temperature {} outside 0.0-2.0",
                self.model.temperature
            )));
        }
        if self.model.context_window == 0 {
            return Err(SettingsError::InvalidValue(
                "model.contextWindow must be positive".to_string(),
            ));
        }
        if self.model.max_output_tokens == 0 {
            return Err(SettingsError::InvalidValue(
                "model.maxOutputTokens must be positive".to_string(),
            ));
        }
        if self.bot.command_prefix.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "bot.commandPrefix is empty".to_string(),
            ));
        }
        if self
            .discord
            .ingress_secret
            .as_deref()
            .is_some_and(|secret| secret.trim().is_empty())
        {
            return Err(SettingsError::InvalidValue(
                "discord.ingressSecret is blank (remove it or set a value)".to_string(),
            ));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

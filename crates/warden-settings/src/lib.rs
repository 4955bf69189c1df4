//! # warden-settings
//!
//! Configuration for the Warden moderation bot, loaded from three layers
//! (in priority order):
//! 1. **Compiled defaults**: [`WardenSettings::default()`]
//! 2. **User file**: `~/.warden/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `OLLAMA_BASE_URL`, `DISCORD_TOKEN`,
//!    `WARDEN_*` and friends (highest priority)
//!
//! Settings are read once at startup and never mutated afterwards.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let settings = WardenSettings::default();
        assert_eq!(settings.model.name, "gemma3:12b-it-qat");
        assert!(settings_path().ends_with(".warden/settings.json"));
    }
}

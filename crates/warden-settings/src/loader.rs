//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`WardenSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::WardenSettings;

/// Resolve the path to the settings file (`~/.warden/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".warden").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<WardenSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<WardenSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<WardenSettings> {
    let defaults = serde_json::to_value(WardenSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut WardenSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are ignored. Invalid numeric values are ignored with a warning.
fn apply_overrides_from<F>(settings: &mut WardenSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let string = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let port = |name: &str| {
        let val = string(name)?;
        let result = parse_u16_range(&val, 1, 65535);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid port env var, ignoring");
        }
        result
    };

    // ── Model ───────────────────────────────────────────────────────
    if let Some(v) = string("OLLAMA_BASE_URL") {
        settings.model.base_url = v;
    }
    if let Some(v) = string("WARDEN_MODEL") {
        settings.model.name = v;
    }

    // ── Bot ─────────────────────────────────────────────────────────
    if let Some(v) = string("DISCORD_TOKEN") {
        settings.bot.token = v;
    }
    if let Some(v) = string("LOG_LEVEL") {
        settings.bot.log_level = v.to_ascii_lowercase();
    }
    if let Some(v) = string("WARDEN_COMMAND_PREFIX") {
        settings.bot.command_prefix = v;
    }
    if let Some(v) = string("WARDEN_MODERATORS") {
        settings.bot.moderators = parse_list(&v);
    }

    // ── Discord ingress ─────────────────────────────────────────────
    if let Some(v) = string("WARDEN_INGRESS_HOST") {
        settings.discord.ingress_host = v;
    }
    if let Some(v) = port("WARDEN_INGRESS_PORT") {
        settings.discord.ingress_port = v;
    }
    if let Some(v) = string("WARDEN_INGRESS_SECRET") {
        settings.discord.ingress_secret = Some(v);
    }

    // ── Policy ──────────────────────────────────────────────────────
    if let Some(v) = string("WARDEN_POLICY_PATH") {
        settings.policy.template_path = Some(PathBuf::from(v));
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Split a comma-separated list, dropping blank entries.
pub fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! # warden-bot
//!
//! Warden moderation bot binary. Loads settings, wires the moderation
//! pipeline to Ollama and Discord, and serves the command ingress until
//! Ctrl-C.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use warden_discord::{DiscordClient, IngressConfig, build_ingress_app};
use warden_llm::{InferenceClient, InferenceConfig, OllamaClient};
use warden_moderation::{ModerationService, PromptBuilder};
use warden_settings::{ModelSettings, WardenSettings};

/// Warden moderation bot.
#[derive(Parser, Debug)]
#[command(name = "warden-bot", about = "LLM-assisted Code of Conduct moderation bot")]
struct Cli {
    /// Settings file (defaults to `~/.warden/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Ingress bind address (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Ingress port (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Skip the startup connectivity probe against the inference backend.
    #[arg(long)]
    skip_probe: bool,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut WardenSettings) {
        if let Some(host) = &self.host {
            settings.discord.ingress_host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.discord.ingress_port = port;
        }
    }
}

fn inference_config(model: &ModelSettings) -> InferenceConfig {
    InferenceConfig {
        base_url: model.base_url.clone(),
        model: model.name.clone(),
        temperature: model.temperature,
        num_ctx: model.context_window,
        num_predict: model.max_output_tokens,
        timeout: Duration::from_millis(model.request_timeout_ms),
    }
}

fn ingress_config(settings: &WardenSettings) -> IngressConfig {
    IngressConfig {
        path: settings.discord.ingress_path.clone(),
        secret: settings.discord.ingress_secret.clone(),
        command_prefix: settings.bot.command_prefix.clone(),
        moderators: settings.bot.moderators.clone(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(warden_settings::settings_path);
    let mut settings = warden_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    args.apply_overrides(&mut settings);

    warden_core::logging::init_subscriber(&settings.bot.log_level);
    settings.validate().context("Invalid settings")?;

    if settings.bot.moderators.is_empty() {
        warn!("no moderators configured; every remove command will be denied");
    }
    if settings.discord.ingress_secret.is_none() {
        warn!("ingress secret not set; any caller can post events to the ingress endpoint");
    }

    let prompts = settings
        .policy
        .load_template()
        .context("Failed to read policy template")?
        .map_or_else(PromptBuilder::default, PromptBuilder::new);

    let inference = Arc::new(
        OllamaClient::new(inference_config(&settings.model))
            .context("Failed to build inference client")?,
    );
    let discord = Arc::new(DiscordClient::with_api_base(
        settings.bot.token.clone(),
        settings.discord.api_base.clone(),
    ));
    let service = Arc::new(ModerationService::new(
        discord.clone(),
        discord.clone(),
        inference.clone(),
        prompts,
    ));

    if args.skip_probe {
        info!("skipping inference backend probe");
    } else {
        // Probe in the background so the ingress is reachable while the model loads.
        let probe = Arc::clone(&inference);
        let _ = tokio::spawn(async move { probe.test_connection().await });
    }

    let ingress = build_ingress_app(service, discord, ingress_config(&settings));
    let addr = format!(
        "{}:{}",
        settings.discord.ingress_host, settings.discord.ingress_port
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind ingress on {addr}"))?;

    info!(
        addr = %listener.local_addr().context("Failed to read bound address")?,
        path = %ingress.path,
        model = %settings.model.name,
        prefix = %settings.bot.command_prefix,
        "warden listening"
    );

    axum::serve(listener, ingress.app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Ingress server failed")?;

    info!("warden stopped");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

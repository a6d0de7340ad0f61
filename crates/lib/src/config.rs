//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.echo-bot/config.json`) and environment.
//! Every field has a default, so an empty file (or no file) gives a working local setup
//! pointed at a gateway on `http://localhost:3000`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound WhatsApp gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Webhook server bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the webhook HTTP server (default 5000).
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

/// Where and how to reach the WhatsApp HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Base URL of the gateway (default "http://localhost:3000"). Overridden by WHATSAPP_API_URL env.
    #[serde(default = "default_gateway_base_url")]
    pub base_url: String,

    /// Gateway session name used for every call (default "default").
    #[serde(default = "default_gateway_session")]
    pub session: String,

    /// Per-call timeout in seconds (default 10).
    #[serde(default = "default_gateway_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent as X-Api-Key when the gateway requires one. Overridden by WHATSAPP_API_KEY env.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_server_port() -> u16 {
    5000
}

fn default_server_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_gateway_session() -> String {
    "default".to_string()
}

fn default_gateway_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_base_url(),
            session: default_gateway_session(),
            timeout_secs: default_gateway_timeout_secs(),
            api_key: None,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings the client cannot work with. Called once at startup.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("gateway.baseUrl must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("gateway.baseUrl must start with http:// or https:// (got {})", url);
        }
        if self.session.trim().is_empty() {
            anyhow::bail!("gateway.session must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("gateway.timeoutSecs must be greater than zero");
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve the gateway base URL: WHATSAPP_API_URL overrides config. Trailing slashes are trimmed.
pub fn resolve_gateway_base_url(config: &Config, env: impl Fn(&str) -> Option<String>) -> String {
    non_empty(env("WHATSAPP_API_URL"))
        .unwrap_or_else(|| config.gateway.base_url.trim().to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Resolve the gateway API key: WHATSAPP_API_KEY overrides config.
pub fn resolve_gateway_api_key(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    non_empty(env("WHATSAPP_API_KEY")).or_else(|| non_empty(config.gateway.api_key.clone()))
}

/// Gateway settings with overrides from `env` applied.
pub fn resolve_gateway_config_with(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> GatewayConfig {
    GatewayConfig {
        base_url: resolve_gateway_base_url(config, &env),
        session: config.gateway.session.trim().to_string(),
        timeout_secs: config.gateway.timeout_secs,
        api_key: resolve_gateway_api_key(config, &env),
    }
}

/// Gateway settings with process env overrides applied. This is what the client is built from.
pub fn resolve_gateway_config(config: &Config) -> GatewayConfig {
    resolve_gateway_config_with(config, process_env)
}

/// Apply `--port` / `--bind` from the command line over the loaded server settings.
pub fn apply_server_overrides(config: &mut Config, port: Option<u16>, bind: Option<String>) {
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(b) = bind.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()) {
        config.server.bind = b;
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("ECHO_BOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".echo-bot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path (or the default path). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        parse_config_file(&path)?
    };
    Ok((config, path))
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing config from {}", path.display()))
}

/// Create the config directory and write a default config file if none exists.
/// Returns the config directory.
pub fn init_config_file(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if config_path.exists() {
        log::debug!("config already exists at {}, skipping", config_path.display());
    } else {
        let contents = serde_json::to_string_pretty(&Config::default())
            .context("serializing default config")?;
        std::fs::write(config_path, contents)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }
    Ok(config_dir.to_path_buf())
}

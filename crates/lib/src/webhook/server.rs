//! Webhook HTTP server: readiness routes plus the `/bot` callback.

use crate::config::{self, Config, GatewayConfig};
use crate::webhook::error::WebhookError;
use crate::webhook::event::InboundEvent;
use crate::webhook::handler::EchoBot;
use crate::whatsapp::WhatsAppClient;
use anyhow::{Context, Result};
use axum::{body::Bytes, extract::State, routing::get, Router};
use std::sync::Arc;

/// Body of every readiness response.
pub const READY_TEXT: &str = "WhatsApp Echo Bot is ready!";

/// Build the router: GET / and GET /bot answer readiness; POST /bot takes gateway callbacks.
pub fn router(bot: Arc<EchoBot>) -> Router {
    Router::new()
        .route("/", get(ready))
        .route("/bot", get(ready).post(bot_webhook))
        .with_state(bot)
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// Gateway settings are resolved (env overrides applied) before handing off to `run_server_with`.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    let gateway = config::resolve_gateway_config(&config);
    run_server_with(config, gateway).await
}

/// Run the webhook server against an already resolved gateway config; `config.gateway` is not read.
/// The gateway config is validated before binding.
pub async fn run_server_with(config: Config, gateway: GatewayConfig) -> Result<()> {
    gateway.validate().context("invalid gateway config")?;
    let client = WhatsAppClient::new(&gateway);
    log::info!(
        "using gateway {} (session {}, timeout {}s{})",
        client.base_url(),
        client.session(),
        gateway.timeout_secs,
        if gateway.api_key.is_some() { ", api key set" } else { "" }
    );
    let bot = Arc::new(EchoBot::new(Arc::new(client)));

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("echo bot listening on {}", bind_addr);

    axum::serve(listener, router(bot))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("echo bot stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining in-flight deliveries");
}

/// GET / and GET /bot.
async fn ready() -> &'static str {
    READY_TEXT
}

/// POST /bot — one gateway callback. Replies with plain text: "OK", "Unknown event {event}",
/// or a 400/502 diagnostic.
async fn bot_webhook(State(bot): State<Arc<EchoBot>>, body: Bytes) -> Result<String, WebhookError> {
    log::debug!("inbound webhook: {}", String::from_utf8_lossy(&body));
    let event = InboundEvent::parse(&body).map_err(|e| {
        log::warn!("rejecting webhook delivery: {}", e);
        e
    })?;
    let outcome = bot.handle(event).await?;
    Ok(outcome.response_text())
}

//! WhatsApp HTTP API gateway: the outbound side of the bot.
//!
//! `WhatsAppApi` is the seam the webhook handler talks to; `WhatsAppClient` is the
//! reqwest-backed implementation that posts to `/api/sendSeen`, `/api/sendText`
//! and `/api/reply` on the configured gateway.

mod api;
mod client;

pub use api::{GatewayError, ReplyRequest, SendSeenRequest, SendTextRequest, WhatsAppApi};
pub use client::WhatsAppClient;

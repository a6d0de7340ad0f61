//! Echo bot core library: configuration, the WhatsApp gateway client, and the webhook
//! server used by the `echo-bot` binary.

pub mod config;
pub mod webhook;
pub mod whatsapp;

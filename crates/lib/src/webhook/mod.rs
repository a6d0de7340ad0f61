//! Webhook: the inbound side of the bot.
//!
//! The gateway POSTs each event to `/bot`. `message` events are echoed back through
//! the `WhatsAppApi` (seen, send, reply, in that order); every other event is acknowledged
//! with "Unknown event {event}" and otherwise ignored.

mod error;
mod event;
mod handler;
mod server;

pub use error::WebhookError;
pub use event::{InboundEvent, MessagePayload, MESSAGE_EVENT};
pub use handler::{EchoBot, Outcome};
pub use server::{router, run_server, run_server_with, READY_TEXT};

//! Inbound webhook event: the gateway's JSON callback, parsed into a typed value.

use crate::webhook::error::WebhookError;
use serde::Deserialize;

/// The only event type the bot acts on.
pub const MESSAGE_EVENT: &str = "message";

const GROUP_CHAT_SUFFIX: &str = "@g.us";

#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Payload of a `message` event. Unknown fields from the gateway are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessagePayload {
    /// Message text.
    pub body: String,
    /// Chat id: `<number>@c.us` for a direct chat, `<id>@g.us` for a group.
    pub from: String,
    /// Message id, e.g. `false_11111111111@c.us_AAAAAAAA`.
    pub id: String,
    /// Sender within a group chat; absent for direct chats.
    #[serde(default)]
    pub participant: Option<String>,
}

impl MessagePayload {
    pub fn is_group_chat(&self) -> bool {
        self.from.ends_with(GROUP_CHAT_SUFFIX)
    }
}

/// One webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message(MessagePayload),
    /// Any other event type; carried by name only, its payload is never inspected.
    Other(String),
}

impl InboundEvent {
    /// Parse a raw POST body. Invalid JSON, a missing `event`, or a `message` event without
    /// the required payload fields is `MalformedPayload`.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;
        if envelope.event != MESSAGE_EVENT {
            return Ok(InboundEvent::Other(envelope.event));
        }
        let payload = envelope
            .payload
            .ok_or_else(|| WebhookError::MalformedPayload("missing field `payload`".to_string()))?;
        let message: MessagePayload = serde_json::from_value(payload)
            .map_err(|e| WebhookError::MalformedPayload(format!("payload: {}", e)))?;
        Ok(InboundEvent::Message(message))
    }

    pub fn name(&self) -> &str {
        match self {
            InboundEvent::Message(_) => MESSAGE_EVENT,
            InboundEvent::Other(name) => name,
        }
    }
}

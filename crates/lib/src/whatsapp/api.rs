//! Gateway call contract: request bodies, errors, and the `WhatsAppApi` trait.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Failure of a single outbound gateway call. Any of these aborts the rest of the echo.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} timed out after {timeout:?}")]
    Timeout {
        endpoint: &'static str,
        timeout: Duration,
    },
    #[error("{endpoint} failed: {status} {body}")]
    Api {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
}

impl GatewayError {
    /// Name of the gateway endpoint that failed (e.g. "sendSeen").
    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayError::Request { endpoint, .. }
            | GatewayError::Timeout { endpoint, .. }
            | GatewayError::Api { endpoint, .. } => *endpoint,
        }
    }
}

/// Body for POST /api/sendSeen. `participant` serializes as null for direct chats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSeenRequest<'a> {
    pub session: &'a str,
    pub chat_id: &'a str,
    pub message_id: &'a str,
    pub participant: Option<&'a str>,
}

/// Body for POST /api/sendText.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTextRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub session: &'a str,
}

/// Body for POST /api/reply. The gateway expects `reply_to` in snake case.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(rename = "reply_to")]
    pub reply_to: &'a str,
    pub session: &'a str,
}

/// Outbound calls the echo bot makes. Implemented by `WhatsAppClient`; tests substitute a recorder.
#[async_trait]
pub trait WhatsAppApi: Send + Sync {
    /// Mark a message as read. Must precede any message sent back to the chat.
    async fn send_seen(
        &self,
        chat_id: &str,
        message_id: &str,
        participant: Option<&str>,
    ) -> Result<(), GatewayError>;

    /// Send a plain (non-threaded) text message.
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), GatewayError>;

    /// Send a text message threaded as a reply to `message_id`.
    async fn reply(&self, chat_id: &str, message_id: &str, text: &str) -> Result<(), GatewayError>;
}

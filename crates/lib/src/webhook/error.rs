//! Webhook failures and how they map to HTTP responses.

use crate::whatsapp::GatewayError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Inbound body is not a usable event. The caller gets a 400.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    /// An outbound gateway call failed; the remaining calls were not made. The caller gets a 502.
    #[error("gateway call failed: {0}")]
    GatewayCallFailed(#[from] GatewayError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::GatewayCallFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

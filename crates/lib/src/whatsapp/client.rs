//! WhatsApp HTTP API client (http://localhost:3000 by default).

use crate::config::GatewayConfig;
use crate::whatsapp::api::{
    GatewayError, ReplyRequest, SendSeenRequest, SendTextRequest, WhatsAppApi,
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Client for the gateway's send/reply/seen endpoints. One session, fixed at construction.
#[derive(Clone)]
pub struct WhatsAppClient {
    base_url: String,
    session: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl WhatsAppClient {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            session: config.session.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// POST a JSON body to /api/{endpoint}; any non-2xx status is an error.
    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<(), GatewayError> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        let mut req = self.client.post(&url).timeout(self.timeout).json(body);
        if let Some(ref key) = self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }
        let res = req.send().await.map_err(|e| self.request_error(endpoint, e))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        log::debug!("{} -> {}", endpoint, res.status());
        Ok(())
    }

    fn request_error(&self, endpoint: &'static str, source: reqwest::Error) -> GatewayError {
        if source.is_timeout() {
            GatewayError::Timeout {
                endpoint,
                timeout: self.timeout,
            }
        } else {
            GatewayError::Request { endpoint, source }
        }
    }
}

#[async_trait]
impl WhatsAppApi for WhatsAppClient {
    async fn send_seen(
        &self,
        chat_id: &str,
        message_id: &str,
        participant: Option<&str>,
    ) -> Result<(), GatewayError> {
        let body = SendSeenRequest {
            session: &self.session,
            chat_id,
            message_id,
            participant,
        };
        self.post("sendSeen", &body).await
    }

    async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), GatewayError> {
        let body = SendTextRequest {
            chat_id,
            text,
            session: &self.session,
        };
        self.post("sendText", &body).await
    }

    async fn reply(&self, chat_id: &str, message_id: &str, text: &str) -> Result<(), GatewayError> {
        let body = ReplyRequest {
            chat_id,
            text,
            reply_to: message_id,
            session: &self.session,
        };
        self.post("reply", &body).await
    }
}

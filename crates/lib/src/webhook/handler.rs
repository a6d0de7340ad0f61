//! Echo pipeline: mark seen, send the text back, then send it again as a threaded reply.

use crate::webhook::error::WebhookError;
use crate::webhook::event::{InboundEvent, MessagePayload};
use crate::whatsapp::{GatewayError, WhatsAppApi};
use std::sync::Arc;

/// What happened to one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All three gateway calls succeeded.
    Echoed,
    /// Event type the bot does not handle; no gateway calls were made.
    Ignored(String),
}

impl Outcome {
    /// Plain-text body returned to the webhook caller.
    pub fn response_text(&self) -> String {
        match self {
            Outcome::Echoed => "OK".to_string(),
            Outcome::Ignored(event) => format!("Unknown event {}", event),
        }
    }
}

/// Echo bot. Stateless apart from the gateway handle, so one instance serves all deliveries.
#[derive(Clone)]
pub struct EchoBot {
    api: Arc<dyn WhatsAppApi>,
}

impl EchoBot {
    pub fn new(api: Arc<dyn WhatsAppApi>) -> Self {
        Self { api }
    }

    pub async fn handle(&self, event: InboundEvent) -> Result<Outcome, WebhookError> {
        match event {
            InboundEvent::Other(name) => {
                log::debug!("ignoring event {}", name);
                Ok(Outcome::Ignored(name))
            }
            InboundEvent::Message(msg) => {
                log::info!(
                    "echoing message {} in {} chat {}",
                    msg.id,
                    if msg.is_group_chat() { "group" } else { "direct" },
                    msg.from
                );
                if let Err(e) = self.echo(&msg).await {
                    log::warn!("echo to {} aborted: {}", msg.from, e);
                    return Err(e.into());
                }
                Ok(Outcome::Echoed)
            }
        }
    }

    /// Seen must go out before anything is sent to the chat. The text is sent twice on purpose:
    /// once as a new message and once as a reply to the original.
    async fn echo(&self, msg: &MessagePayload) -> Result<(), GatewayError> {
        self.api
            .send_seen(&msg.from, &msg.id, msg.participant.as_deref())
            .await?;
        self.api.send_text(&msg.from, &msg.body).await?;
        self.api.reply(&msg.from, &msg.id, &msg.body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Seen {
            chat_id: String,
            message_id: String,
            participant: Option<String>,
        },
        Text {
            chat_id: String,
            text: String,
        },
        Reply {
            chat_id: String,
            message_id: String,
            text: String,
        },
    }

    /// Records every call; fails the call whose endpoint matches `fail_on`.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<Call>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingApi {
        fn failing(endpoint: &'static str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(endpoint),
            }
        }

        fn record(&self, endpoint: &'static str, call: Call) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(call);
            if self.fail_on == Some(endpoint) {
                return Err(GatewayError::Api {
                    endpoint,
                    status: 500,
                    body: "session not ready".to_string(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WhatsAppApi for RecordingApi {
        async fn send_seen(
            &self,
            chat_id: &str,
            message_id: &str,
            participant: Option<&str>,
        ) -> Result<(), GatewayError> {
            self.record(
                "sendSeen",
                Call::Seen {
                    chat_id: chat_id.to_string(),
                    message_id: message_id.to_string(),
                    participant: participant.map(str::to_string),
                },
            )
        }

        async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), GatewayError> {
            self.record(
                "sendText",
                Call::Text {
                    chat_id: chat_id.to_string(),
                    text: text.to_string(),
                },
            )
        }

        async fn reply(
            &self,
            chat_id: &str,
            message_id: &str,
            text: &str,
        ) -> Result<(), GatewayError> {
            self.record(
                "reply",
                Call::Reply {
                    chat_id: chat_id.to_string(),
                    message_id: message_id.to_string(),
                    text: text.to_string(),
                },
            )
        }
    }

    fn message(participant: Option<&str>) -> InboundEvent {
        InboundEvent::Message(MessagePayload {
            body: "hi".to_string(),
            from: "555@c.us".to_string(),
            id: "m1".to_string(),
            participant: participant.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn message_is_seen_then_sent_then_replied() {
        let api = Arc::new(RecordingApi::default());
        let bot = EchoBot::new(api.clone());

        let outcome = bot.handle(message(None)).await.unwrap();
        assert_eq!(outcome, Outcome::Echoed);
        assert_eq!(outcome.response_text(), "OK");
        assert_eq!(
            api.calls(),
            vec![
                Call::Seen {
                    chat_id: "555@c.us".into(),
                    message_id: "m1".into(),
                    participant: None,
                },
                Call::Text {
                    chat_id: "555@c.us".into(),
                    text: "hi".into(),
                },
                Call::Reply {
                    chat_id: "555@c.us".into(),
                    message_id: "m1".into(),
                    text: "hi".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn participant_is_passed_to_seen() {
        let api = Arc::new(RecordingApi::default());
        let bot = EchoBot::new(api.clone());
        bot.handle(message(Some("777@c.us"))).await.unwrap();
        assert!(matches!(
            &api.calls()[0],
            Call::Seen { participant: Some(p), .. } if p == "777@c.us"
        ));
    }

    #[tokio::test]
    async fn other_events_make_no_calls() {
        let api = Arc::new(RecordingApi::default());
        let bot = EchoBot::new(api.clone());
        let outcome = bot
            .handle(InboundEvent::Other("status".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome.response_text(), "Unknown event status");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_seen_stops_before_sending() {
        let api = Arc::new(RecordingApi::failing("sendSeen"));
        let bot = EchoBot::new(api.clone());
        let err = bot.handle(message(None)).await.unwrap_err();
        assert!(matches!(
            err,
            WebhookError::GatewayCallFailed(ref e) if e.endpoint() == "sendSeen"
        ));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_send_skips_reply() {
        let api = Arc::new(RecordingApi::failing("sendText"));
        let bot = EchoBot::new(api.clone());
        assert!(bot.handle(message(None)).await.is_err());
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls.iter().any(|c| matches!(c, Call::Reply { .. })));
    }
}

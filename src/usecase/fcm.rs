use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use crate::domain::notification::NotificationPayload;
use crate::usecase::contracts::PushDispatcher;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("push request failed: {0}")]
    Transport(String),

    #[error("push endpoint returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// FCM-compatible HTTP push client. The base URL is configurable so tests
/// can point the client at a local mock server.
#[derive(Clone)]
pub struct FcmClient {
    client: Client,
    base_url: String,
    server_key: String,
}

impl FcmClient {
    pub fn new(base_url: String, server_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build fcm http client");
        Self {
            client,
            base_url,
            server_key,
        }
    }

    async fn post_message(&self, body: serde_json::Value) -> Result<(), DispatchError> {
        let resp = self
            .client
            .post(format!("{}/fcm/send", self.base_url))
            .header("Authorization", format!("key={}", self.server_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

impl PushDispatcher for FcmClient {
    #[tracing::instrument(skip(self, payload), fields(%topic))]
    async fn send_to_topic(
        &self,
        topic: &str,
        payload: &NotificationPayload,
    ) -> Result<(), DispatchError> {
        tracing::debug!("sending topic push");

        self.post_message(json!({
            "to": format!("/topics/{topic}"),
            "notification": { "title": payload.title, "body": payload.body },
            "data": payload.data,
        }))
        .await
    }

    #[tracing::instrument(skip(self, tokens, payload), fields(token_count = tokens.len()))]
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &NotificationPayload,
    ) -> Result<(), DispatchError> {
        tracing::debug!("sending multicast push");

        self.post_message(json!({
            "registration_ids": tokens,
            "notification": { "title": payload.title, "body": payload.body },
            "data": payload.data,
        }))
        .await
    }
}

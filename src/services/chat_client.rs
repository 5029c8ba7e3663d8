//! Chat webhook client
//!
//! Posts plain-text announcements to the fixed webhook endpoint. The
//! endpoint authenticates by URL token, so no bearer header is attached.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "evishare/0.1";

/// Webhook client errors
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    tts: bool,
}

/// Chat webhook client
pub struct ChatWebhookClient {
    http_client: reqwest::Client,
    webhook_url: String,
}

impl ChatWebhookClient {
    pub fn new(webhook_url: String) -> Result<Self, WebhookError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WebhookError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            webhook_url,
        })
    }

    /// Post one message. Any 2xx status counts as delivered.
    pub async fn post(&self, content: &str) -> Result<(), WebhookError> {
        let payload = WebhookPayload {
            content,
            tts: false,
        };

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WebhookError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WebhookError::ApiError(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = WebhookPayload {
            content: "7. title (tanaka)",
            tts: false,
        };
        let raw = serde_json::to_value(&payload).unwrap();

        assert_eq!(raw["content"], "7. title (tanaka)");
        assert_eq!(raw["tts"], false);
    }
}
